//! HTTP clients for the external event and places services.

pub mod events;
pub mod places;

pub use events::EventSource;
pub use places::{NearbyRequest, PlacesClient};

use std::time::Duration;

use url::Url;

use crate::error::SourceError;

fn parse_endpoint(endpoint: &str) -> Result<Url, SourceError> {
    Url::parse(endpoint).map_err(|source| SourceError::InvalidEndpoint {
        url: endpoint.to_string(),
        source,
    })
}

fn build_client(endpoint: &Url, timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| SourceError::Request {
            endpoint: endpoint.to_string(),
            source,
        })
}
