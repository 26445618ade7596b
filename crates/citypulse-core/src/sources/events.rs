//! Events-by-city lookup.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use super::{build_client, parse_endpoint};
use crate::error::SourceError;
use crate::event::{normalize_all, EventCollection, RawEvent};
use crate::storage::ApiConfig;

/// Client for the events endpoint: `GET {endpoint}?city=<city>`.
#[derive(Debug, Clone)]
pub struct EventSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl EventSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SourceError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = build_client(&endpoint, timeout)?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, SourceError> {
        Self::new(&api.events_url, api.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and normalize the events for `city`.
    ///
    /// Records that are not JSON objects, or whose fields have the wrong
    /// types, are skipped with a warning.
    pub async fn fetch_events(&self, city: &str) -> Result<EventCollection, SourceError> {
        let request_failed = |source| SourceError::Request {
            endpoint: self.endpoint.to_string(),
            source,
        };

        tracing::debug!(endpoint = %self.endpoint, city, "fetching events");
        let body: Value = self
            .client
            .get(self.endpoint.clone())
            .query(&[("city", city)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_failed)?
            .json()
            .await
            .map_err(request_failed)?;

        let records = parse_event_records(body)?;
        let events = normalize_all(records);
        tracing::info!(city, events = events.len(), "events fetched");
        Ok(events)
    }
}

/// Raw records from an events response body.
///
/// Accepts a bare array or an object wrapping it under `events`.
pub fn parse_event_records(body: Value) -> Result<Vec<RawEvent>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("events") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::MalformedResponse(
                    "expected an array of events".into(),
                ))
            }
        },
        _ => {
            return Err(SourceError::MalformedResponse(
                "expected an array of events".into(),
            ))
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<RawEvent>(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed event record");
                None
            }
        })
        .collect())
}
