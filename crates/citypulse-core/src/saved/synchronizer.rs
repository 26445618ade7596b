//! Local mirror of the signed-in user's saved events.
//!
//! [`SavedCollection`] keeps an ordered mirror in step with a remote
//! [`CollectionStore`]. The mirror only changes after the store confirms a
//! write, so a failed add or remove leaves it exactly as it was.
//!
//! Operations on one collection are serialized. Each one captures the session
//! token before it suspends and re-checks it when the store answers; if the
//! user signed out (or switched) meanwhile, the answer is dropped and the
//! caller gets [`SyncError::SessionChanged`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as OpLock;

use super::session::{AuthTransition, SessionContext, SessionState, SessionToken, UserId};
use super::store::CollectionStore;
use crate::error::SyncError;
use crate::event::{Event, EventCollection};

/// A removal that has been checked but not yet confirmed by the user.
///
/// Created by [`SavedCollection::prepare_remove`]. Dropping it cancels the
/// removal; nothing is touched until [`SavedCollection::commit_remove`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    id: String,
    name: String,
    token: SessionToken,
}

impl PendingRemoval {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Event name, for the confirmation prompt.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
struct Mirror {
    session: SessionContext,
    state: SessionState,
    events: EventCollection,
}

pub struct SavedCollection<S> {
    store: S,
    mirror: Mutex<Mirror>,
    op_lock: OpLock<()>,
}

impl<S: CollectionStore> SavedCollection<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            mirror: Mutex::new(Mirror {
                session: SessionContext::signed_out(),
                state: SessionState::SignedOut,
                events: EventCollection::new(),
            }),
            op_lock: OpLock::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.mirror().state
    }

    pub fn session(&self) -> SessionContext {
        self.mirror().session.clone()
    }

    /// Copy of the mirror, in insertion order.
    pub fn snapshot(&self) -> EventCollection {
        self.mirror().events.clone()
    }

    pub fn get(&self, id: &str) -> Option<Event> {
        self.mirror().events.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mirror().events.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mirror().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror().events.is_empty()
    }

    /// Record an auth change.
    ///
    /// Signing out clears the mirror at once. Signing in moves to
    /// [`SessionState::Loading`]; the caller then runs [`Self::load_all`], or
    /// uses [`Self::sign_in`] to do both.
    pub fn on_auth_change(&self, user: Option<UserId>) -> AuthTransition {
        let mut mirror = self.mirror();
        let (next, change) = mirror.session.transition(user);
        mirror.session = next;

        match &change {
            AuthTransition::SignedIn(token) => {
                tracing::info!(user = %token.user(), epoch = token.epoch(), "signed in");
                mirror.state = SessionState::Loading;
                mirror.events.clear();
            }
            AuthTransition::SignedOut => {
                tracing::info!(epoch = mirror.session.epoch(), "signed out");
                mirror.state = SessionState::SignedOut;
                mirror.events.clear();
            }
            AuthTransition::Unchanged => {}
        }
        change
    }

    /// Apply an auth change and, on sign-in, load the saved collection.
    pub async fn sign_in(&self, user: UserId) -> Result<EventCollection, SyncError> {
        match self.on_auth_change(Some(user)) {
            AuthTransition::SignedIn(_) => self.load_all().await,
            _ if self.state() == SessionState::Loaded => Ok(self.snapshot()),
            _ => self.load_all().await,
        }
    }

    pub fn sign_out(&self) {
        self.on_auth_change(None);
    }

    /// Replace the mirror with the full remote collection.
    ///
    /// On failure the mirror keeps its last loaded contents.
    pub async fn load_all(&self) -> Result<EventCollection, SyncError> {
        let token = self.current_token()?;
        let _op = self.op_lock.lock().await;
        self.load_locked(&token).await
    }

    /// Save `event` and return the id it is stored under.
    ///
    /// The mirror gains the event only once the store has accepted it.
    pub async fn add(&self, event: Event) -> Result<String, SyncError> {
        let token = self.current_token()?;
        let _op = self.op_lock.lock().await;
        self.ensure_loaded(&token).await?;

        let id = match self.store.add(token.user(), &event).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(user = %token.user(), event = %event.id, error = %e, "save failed");
                return Err(e);
            }
        };

        let mut mirror = self.mirror();
        if !mirror.session.is_current(&token) {
            tracing::warn!(event = %id, "save confirmed after session change; discarding");
            return Err(SyncError::SessionChanged);
        }
        let mut stored = event;
        stored.id = id.clone();
        mirror.events.insert(id.clone(), stored);
        tracing::info!(event = %id, saved = mirror.events.len(), "event saved");
        Ok(id)
    }

    /// First step of a removal: check that `id` is saved.
    pub fn prepare_remove(&self, id: &str) -> Result<PendingRemoval, SyncError> {
        let mirror = self.mirror();
        let token = mirror.session.token().ok_or(SyncError::NotAuthenticated)?;
        let event = mirror
            .events
            .get(id)
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;

        Ok(PendingRemoval {
            id: id.to_string(),
            name: event.name.clone(),
            token,
        })
    }

    /// Second step of a removal: delete remotely, then from the mirror.
    pub async fn commit_remove(&self, pending: PendingRemoval) -> Result<Event, SyncError> {
        let token = self.current_token()?;
        if token != pending.token {
            return Err(SyncError::SessionChanged);
        }

        let _op = self.op_lock.lock().await;
        if let Err(e) = self.store.remove(token.user(), &pending.id).await {
            tracing::warn!(user = %token.user(), event = %pending.id, error = %e, "remove failed");
            return Err(e);
        }

        let mut mirror = self.mirror();
        if !mirror.session.is_current(&token) {
            tracing::warn!(event = %pending.id, "remove confirmed after session change; discarding");
            return Err(SyncError::SessionChanged);
        }
        let removed = mirror
            .events
            .shift_remove(&pending.id)
            .ok_or_else(|| SyncError::NotFound(pending.id.clone()))?;
        tracing::info!(event = %pending.id, saved = mirror.events.len(), "event removed");
        Ok(removed)
    }

    /// Both removal steps at once, for callers that already confirmed.
    pub async fn remove(&self, id: &str) -> Result<Event, SyncError> {
        let pending = self.prepare_remove(id)?;
        self.commit_remove(pending).await
    }

    fn current_token(&self) -> Result<SessionToken, SyncError> {
        self.mirror().session.token().ok_or(SyncError::NotAuthenticated)
    }

    /// Run a pending sign-in load before a write. Caller holds the op lock.
    async fn ensure_loaded(&self, token: &SessionToken) -> Result<(), SyncError> {
        if self.state() == SessionState::Loading {
            self.load_locked(token).await?;
        }
        Ok(())
    }

    async fn load_locked(&self, token: &SessionToken) -> Result<EventCollection, SyncError> {
        let loaded = match self.store.list(token.user()).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(user = %token.user(), error = %e, "load failed");
                return Err(e);
            }
        };

        let mut mirror = self.mirror();
        if !mirror.session.is_current(token) {
            tracing::warn!(user = %token.user(), "load finished after session change; discarding");
            return Err(SyncError::SessionChanged);
        }
        mirror.events = loaded;
        mirror.state = SessionState::Loaded;
        tracing::info!(user = %token.user(), saved = mirror.events.len(), "saved events loaded");
        Ok(mirror.events.clone())
    }

    fn mirror(&self) -> MutexGuard<'_, Mirror> {
        self.mirror.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
