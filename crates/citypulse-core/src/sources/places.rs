//! Nearby-places lookup around an event.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{build_client, parse_endpoint};
use crate::error::SourceError;
use crate::event::Event;
use crate::geo::place::{parse_places_response, PlacesData};
use crate::storage::{ApiConfig, PlacesConfig};

/// Request body for the places endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyRequest {
    pub event_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub venue: String,
    pub datetime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub radius: u32,
    pub limit: u32,
    pub types: Vec<String>,
}

impl NearbyRequest {
    /// Request for the places around `event`. `None` without coordinates.
    pub fn for_event(event: &Event, params: &PlacesConfig) -> Option<Self> {
        let (lat, lng) = event.coordinates()?;
        Some(Self {
            event_id: event.id.clone(),
            name: event.name.clone(),
            lat,
            lng,
            address: event.address.clone(),
            venue: event.location.clone(),
            datetime: event.time.clone(),
            url: event.url.clone(),
            radius: params.radius,
            limit: params.limit,
            types: params.types.clone(),
        })
    }
}

/// Client for the places endpoint: `POST {endpoint}` with a [`NearbyRequest`].
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl PlacesClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SourceError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = build_client(&endpoint, timeout)?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, SourceError> {
        Self::new(&api.places_url, api.timeout())
    }

    /// Look up places near the request's coordinates.
    ///
    /// Transport and status failures are errors. A response body of the wrong
    /// shape is not: it yields no places.
    pub async fn fetch_nearby_places(&self, request: &NearbyRequest) -> Result<PlacesData, SourceError> {
        let request_failed = |source| SourceError::Request {
            endpoint: self.endpoint.to_string(),
            source,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            event = %request.event_id,
            radius = request.radius,
            "fetching nearby places"
        );
        let body: Value = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_failed)?
            .json()
            .await
            .map_err(request_failed)?;

        let places = parse_places_response(&body);
        tracing::info!(
            event = %request.event_id,
            places = places.features.len(),
            "nearby places fetched"
        );
        Ok(places)
    }

    /// Like [`Self::fetch_nearby_places`], but a failure means "no places".
    ///
    /// The map then shows the event marker alone.
    pub async fn nearby_or_none(&self, request: &NearbyRequest) -> Option<PlacesData> {
        match self.fetch_nearby_places(request).await {
            Ok(places) => Some(places),
            Err(e) => {
                tracing::warn!(event = %request.event_id, error = %e, "places lookup failed");
                None
            }
        }
    }
}
