//! Event records and the normalization boundary.
//!
//! Everything that enters the filter engine is an [`Event`], and the only way
//! to build one from external data is [`RawEvent::normalize`]. That keeps the
//! matcher free of missing-field checks: every text field it reads is a
//! defined string.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter::time_window::parse_timestamp;

/// Placeholder for an event without a description.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Placeholder for unknown names, venues and times.
pub const UNKNOWN: &str = "Unknown";

/// Time value some upstream feeds use for unscheduled events.
const TBD: &str = "TBD";

/// Insertion-ordered `id -> Event` mapping. Iteration order is the order the
/// source delivered the events in.
pub type EventCollection = IndexMap<String, Event>;

/// A discoverable event with every displayable field defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub address: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub genre: String,
    /// Start time as delivered upstream, or [`UNKNOWN`].
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Event {
    /// Coordinates as `(lat, lng)` when both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Human-readable start time, e.g. `Mar 1, 2025, 7:30 PM`.
    ///
    /// Times that cannot be parsed are returned unchanged.
    pub fn display_time(&self) -> String {
        match parse_timestamp(&self.time) {
            Ok(at) => at.format("%b %-d, %Y, %-I:%M %p").to_string(),
            Err(_) => self.time.clone(),
        }
    }
}

/// An event record as delivered by an external source, before normalization.
///
/// Accepts both field spellings seen upstream: `location`/`time`/`latitude`
/// and `venue`/`datetime`/`lat`/`lng`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "venue")]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, alias = "datetime")]
    pub time: Option<String>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawEvent {
    /// Fill defaults for every missing field and resolve an id.
    ///
    /// The id is the record's own id, else its url, else a fresh UUID.
    pub fn normalize(self) -> Event {
        let id = non_empty(self.id)
            .or_else(|| non_empty(self.url.clone()))
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let time = match non_empty(self.time) {
            Some(t) if t != TBD => t,
            _ => UNKNOWN.to_string(),
        };

        Event {
            id,
            name: non_empty(self.name).unwrap_or_else(|| UNKNOWN.to_string()),
            description: non_empty(self.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            location: non_empty(self.location).unwrap_or_else(|| UNKNOWN.to_string()),
            address: self.address.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            time,
            latitude: self.latitude,
            longitude: self.longitude,
            url: non_empty(self.url),
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        Self {
            id: Some(event.id),
            name: Some(event.name),
            description: Some(event.description),
            location: Some(event.location),
            address: Some(event.address),
            event_type: Some(event.event_type),
            genre: Some(event.genre),
            time: Some(event.time),
            latitude: event.latitude,
            longitude: event.longitude,
            url: event.url,
        }
    }
}

/// Normalize a batch of raw records into a collection.
///
/// A later record with an id already present replaces the earlier one but
/// keeps its position.
pub fn normalize_all(raw: impl IntoIterator<Item = RawEvent>) -> EventCollection {
    let mut events = EventCollection::new();
    for record in raw {
        let event = record.normalize();
        if events.contains_key(&event.id) {
            tracing::debug!(id = %event.id, "duplicate event id, keeping the latest record");
        }
        events.insert(event.id.clone(), event);
    }
    events
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
