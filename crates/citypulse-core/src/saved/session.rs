//! Auth session state for the saved-events synchronizer.
//!
//! ## State Transitions
//!
//! ```text
//! SignedOut -> (sign-in) -> Loading -> Loaded
//! Loaded -> (add/remove) -> Loaded
//! any -> (sign-out) -> SignedOut
//! ```
//!
//! Every sign-in or sign-out bumps the session epoch. Operations capture a
//! [`SessionToken`] before suspending and compare it on arrival; a mismatch
//! means the session they belonged to is gone.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// `None` for an empty or blank identity.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    SignedOut,
    /// Signed in, saved collection not yet loaded.
    Loading,
    Loaded,
}

/// Proof of which session an in-flight operation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    user: UserId,
    epoch: u64,
}

impl SessionToken {
    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Current auth context: who is signed in, and which session this is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<UserId>,
    epoch: u64,
}

/// What an auth change did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTransition {
    /// A new session started; the saved collection must be loaded.
    SignedIn(SessionToken),
    SignedOut,
    /// Same user as before (or still signed out); nothing to do.
    Unchanged,
}

impl SessionContext {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Token for the current session, `None` when signed out.
    pub fn token(&self) -> Option<SessionToken> {
        self.user.as_ref().map(|user| SessionToken {
            user: user.clone(),
            epoch: self.epoch,
        })
    }

    /// Whether `token` still names the current session.
    pub fn is_current(&self, token: &SessionToken) -> bool {
        self.epoch == token.epoch && self.user.as_ref() == Some(&token.user)
    }

    /// The context after an auth event, and what changed.
    pub fn transition(&self, user: Option<UserId>) -> (Self, AuthTransition) {
        if user == self.user {
            return (self.clone(), AuthTransition::Unchanged);
        }

        let next = Self {
            user,
            epoch: self.epoch + 1,
        };
        let change = match next.token() {
            Some(token) => AuthTransition::SignedIn(token),
            None => AuthTransition::SignedOut,
        };
        (next, change)
    }
}
