//! The signed-in user's saved events.
//!
//! [`SavedCollection`] mirrors a remote per-user collection behind the
//! [`CollectionStore`] trait. [`JsonFileStore`] is the on-disk store used by
//! the CLI, [`MemoryStore`] the in-process one.

pub mod file_store;
pub mod session;
pub mod store;
pub mod synchronizer;


pub use file_store::JsonFileStore;
pub use session::{AuthTransition, SessionContext, SessionState, SessionToken, UserId};
pub use store::{CollectionStore, MemoryStore, SAVED_EVENTS_COLLECTION};
pub use synchronizer::{PendingRemoval, SavedCollection};
