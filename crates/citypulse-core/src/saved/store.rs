//! The per-user saved-events collection as seen by the synchronizer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::session::UserId;
use crate::error::SyncError;
use crate::event::{Event, EventCollection};

/// Name of the per-user sub-collection holding saved events.
pub const SAVED_EVENTS_COLLECTION: &str = "savedEvents";

/// A remote, per-user collection of saved events.
///
/// Implementations report failures as [`SyncError::RemoteReadFailure`] or
/// [`SyncError::RemoteWriteFailure`] carrying the remote message.
pub trait CollectionStore: Send + Sync {
    /// Every saved event for `user`, in store order.
    fn list(&self, user: &UserId) -> impl Future<Output = Result<EventCollection, SyncError>> + Send;

    /// Persist `event` and return the id it is stored under.
    fn add(&self, user: &UserId, event: &Event)
        -> impl Future<Output = Result<String, SyncError>> + Send;

    /// Delete the event stored under `id`. Deleting a missing id succeeds.
    fn remove(&self, user: &UserId, id: &str) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// In-process store, mainly for tests and offline use.
///
/// Reads and writes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<UserId, EventCollection>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the collection for `user`.
    pub fn with_events(self, user: &UserId, events: impl IntoIterator<Item = Event>) -> Self {
        {
            let mut users = self.users();
            let collection = users.entry(user.clone()).or_default();
            for event in events {
                collection.insert(event.id.clone(), event);
            }
        }
        self
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current stored ids for `user`, in order.
    pub fn ids(&self, user: &UserId) -> Vec<String> {
        self.users()
            .get(user)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn users(&self) -> MutexGuard<'_, HashMap<UserId, EventCollection>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writes(&self) -> Result<(), SyncError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteWriteFailure("store unavailable".into()));
        }
        Ok(())
    }
}

impl CollectionStore for MemoryStore {
    async fn list(&self, user: &UserId) -> Result<EventCollection, SyncError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteReadFailure("store unavailable".into()));
        }
        Ok(self.users().get(user).cloned().unwrap_or_default())
    }

    async fn add(&self, user: &UserId, event: &Event) -> Result<String, SyncError> {
        self.check_writes()?;
        let id = assign_id(event);
        let mut stored = event.clone();
        stored.id = id.clone();
        self.users()
            .entry(user.clone())
            .or_default()
            .insert(id.clone(), stored);
        Ok(id)
    }

    async fn remove(&self, user: &UserId, id: &str) -> Result<(), SyncError> {
        self.check_writes()?;
        if let Some(collection) = self.users().get_mut(user) {
            collection.shift_remove(id);
        }
        Ok(())
    }
}

/// Id a store keeps an event under: its own id, or a fresh one.
pub(crate) fn assign_id(event: &Event) -> String {
    if event.id.trim().is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        event.id.clone()
    }
}
