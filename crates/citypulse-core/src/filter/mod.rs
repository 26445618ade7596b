//! Event filtering: composite filter state, per-event matching and the
//! collection-wide filter pass.

pub mod engine;
pub mod matcher;
pub mod time_window;

#[cfg(test)]
mod engine_tests;

use serde::{Deserialize, Serialize};

pub use engine::{filter, filter_at, FilterEngine};
pub use matcher::{matches, matches_at};
pub use time_window::{in_range, in_range_at, TimeWindow};

/// The user's current query. An empty field places no constraint.
///
/// Values are replaced wholesale: the `with_*` builders consume the state and
/// return a new one, so a half-updated filter is never observable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub time: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self { text: text.into(), ..self }
    }

    pub fn with_type(self, event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into(), ..self }
    }

    pub fn with_genre(self, genre: impl Into<String>) -> Self {
        Self { genre: genre.into(), ..self }
    }

    pub fn with_time(self, time: impl Into<String>) -> Self {
        Self { time: time.into(), ..self }
    }

    /// True when no field constrains anything.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.event_type.is_empty()
            && self.genre.is_empty()
            && self.time.is_empty()
    }

    /// Clear categorical values the vocabulary does not know.
    ///
    /// An unrecognized type, genre or time window becomes "no constraint"
    /// instead of silently matching nothing.
    pub fn sanitized(self, vocabulary: &Vocabulary) -> Self {
        let event_type = if vocabulary.accepts_type(&self.event_type) {
            self.event_type
        } else {
            tracing::debug!(value = %self.event_type, "ignoring unrecognized type filter");
            String::new()
        };
        let genre = if vocabulary.accepts_genre(&self.genre) {
            self.genre
        } else {
            tracing::debug!(value = %self.genre, "ignoring unrecognized genre filter");
            String::new()
        };
        let time = if self.time.is_empty() || TimeWindow::parse(&self.time).is_some() {
            self.time
        } else {
            tracing::debug!(value = %self.time, "ignoring unrecognized time window");
            String::new()
        };

        Self {
            text: self.text,
            event_type,
            genre,
            time,
        }
    }
}

/// Known category values for the `type` and `genre` filters.
///
/// Loaded from configuration. An empty list accepts any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    #[serde(default = "default_genres")]
    pub genres: Vec<String>,
}

fn default_types() -> Vec<String> {
    ["music", "sports", "theater", "other"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_genres() -> Vec<String> {
    ["rock", "hiphop", "classical", "comedy"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            types: default_types(),
            genres: default_genres(),
        }
    }
}

impl Vocabulary {
    pub fn accepts_type(&self, value: &str) -> bool {
        accepts(&self.types, value)
    }

    pub fn accepts_genre(&self, value: &str) -> bool {
        accepts(&self.genres, value)
    }
}

fn accepts(known: &[String], value: &str) -> bool {
    value.is_empty() || known.is_empty() || known.iter().any(|k| k == value)
}
