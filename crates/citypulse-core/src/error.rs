//! Core error types for citypulse-core.
//!
//! Pure computations (filtering, classification, aggregation) never fail on
//! malformed optional input. Only the I/O-bound parts of the crate (event and
//! places sources, the saved-collection synchronizer, configuration on disk)
//! surface errors, and they do so through the enums below.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Errors from the external event and places sources.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Endpoint URL in the configuration is not a valid URL
    #[error("Invalid endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport or HTTP status failure
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from the saved-collection synchronizer and its stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No signed-in user; callers surface this instead of retrying.
    #[error("Not authenticated: sign in to manage saved events")]
    NotAuthenticated,

    /// The store rejected or failed a write.
    #[error("Failed to write saved events: {0}")]
    RemoteWriteFailure(String),

    /// The store failed a read.
    #[error("Failed to read saved events: {0}")]
    RemoteReadFailure(String),

    /// The event is not in the saved collection.
    #[error("Saved event not found: {0}")]
    NotFound(String),

    /// The session ended or changed user while the operation was in flight;
    /// its result was discarded.
    #[error("Session changed while the operation was in flight; result discarded")]
    SessionChanged,
}

/// A timestamp that could not be read as a calendar date.
///
/// The time-window classifier recovers from this locally by failing open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unparseable timestamp '{0}'")]
pub struct ParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_carry_the_remote_message() {
        let err = SyncError::RemoteWriteFailure("quota exceeded".into());
        assert_eq!(err.to_string(), "Failed to write saved events: quota exceeded");
    }
}
