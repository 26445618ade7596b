//! Saved events kept as one JSON document per user on local disk.

use std::path::{Path, PathBuf};

use super::session::UserId;
use super::store::{assign_id, CollectionStore, SAVED_EVENTS_COLLECTION};
use crate::error::{ConfigError, SyncError};
use crate::event::{Event, EventCollection};
use crate::storage::data_dir;

/// A [`CollectionStore`] writing `<root>/savedEvents/<user>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the application data directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::new(data_dir()?))
    }

    /// File holding `user`'s collection.
    ///
    /// The user id is percent-encoded, so distinct ids never share a file.
    pub fn path_for(&self, user: &UserId) -> PathBuf {
        let file = urlencoding::encode(user.as_str());
        self.root
            .join(SAVED_EVENTS_COLLECTION)
            .join(format!("{file}.json"))
    }

    fn read(&self, path: &Path) -> Result<EventCollection, SyncError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(EventCollection::new())
            }
            Err(e) => return Err(SyncError::RemoteReadFailure(format!("{}: {e}", path.display()))),
        };

        let stored: Vec<Event> = serde_json::from_str(&content)
            .map_err(|e| SyncError::RemoteReadFailure(format!("{}: {e}", path.display())))?;
        Ok(stored.into_iter().map(|e| (e.id.clone(), e)).collect())
    }

    fn write(&self, path: &Path, events: &EventCollection) -> Result<(), SyncError> {
        let write_failed = |e: &dyn std::fmt::Display| {
            SyncError::RemoteWriteFailure(format!("{}: {e}", path.display()))
        };

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| write_failed(&e))?;
        }
        let list: Vec<&Event> = events.values().collect();
        let content = serde_json::to_string_pretty(&list).map_err(|e| write_failed(&e))?;

        // Replace via rename; readers see the old or the new file, never a partial one.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| write_failed(&e))?;
        std::fs::rename(&tmp, path).map_err(|e| write_failed(&e))?;
        Ok(())
    }
}

impl CollectionStore for JsonFileStore {
    async fn list(&self, user: &UserId) -> Result<EventCollection, SyncError> {
        self.read(&self.path_for(user))
    }

    async fn add(&self, user: &UserId, event: &Event) -> Result<String, SyncError> {
        let path = self.path_for(user);
        // An unreadable file must not be overwritten by a fresh one.
        let mut events = self
            .read(&path)
            .map_err(|e| SyncError::RemoteWriteFailure(e.to_string()))?;

        let id = assign_id(event);
        let mut stored = event.clone();
        stored.id = id.clone();
        events.insert(id.clone(), stored);
        self.write(&path, &events)?;
        Ok(id)
    }

    async fn remove(&self, user: &UserId, id: &str) -> Result<(), SyncError> {
        let path = self.path_for(user);
        let mut events = self
            .read(&path)
            .map_err(|e| SyncError::RemoteWriteFailure(e.to_string()))?;

        if events.shift_remove(id).is_some() {
            self.write(&path, &events)?;
        }
        Ok(())
    }
}
