//! # CityPulse Core Library
//!
//! The event-discovery engine behind the `citypulse` CLI: filtering a city's
//! events against a composite query, and shaping an event plus its nearby
//! places into map markers.
//!
//! ## Architecture
//!
//! - **Filter**: Text, category and relative time-window matching over an
//!   ordered event collection. Pure and synchronous.
//! - **Geo**: Place classification, anchor deduplication and marker
//!   aggregation for the map view. Pure and synchronous.
//! - **Saved**: A per-user saved-events mirror kept in step with a remote
//!   store, guarded by an explicit auth session.
//! - **Sources**: HTTP clients for the events and nearby-places services
//! - **Storage**: TOML configuration and the data directory
//!
//! ## Key Components
//!
//! - [`FilterEngine`]: Filter state plus the filter operation
//! - [`aggregate`]: Marker list for an anchor and its places
//! - [`SavedCollection`]: Saved-events synchronizer
//! - [`Config`]: Application configuration management

pub mod error;
pub mod event;
pub mod filter;
pub mod geo;
pub mod saved;
pub mod sources;
pub mod storage;

pub use error::{ConfigError, ParseError, SourceError, SyncError};
pub use event::{Event, EventCollection, RawEvent};
pub use filter::{filter, in_range, matches, FilterEngine, FilterState, TimeWindow, Vocabulary};
pub use geo::{aggregate, classify, Anchor, MapMarker, MarkerSummary, PlaceFeature, PlacesData};
pub use saved::{CollectionStore, JsonFileStore, SavedCollection, SessionState, UserId};
pub use sources::{EventSource, NearbyRequest, PlacesClient};
pub use storage::Config;
