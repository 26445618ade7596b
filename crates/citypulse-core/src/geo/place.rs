//! Nearby places and the tolerant reader for places-lookup responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{Event, UNKNOWN};

/// A point of interest near an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceFeature {
    pub id: String,
    pub name: String,
    /// Dotted category such as `catering.restaurant`, when the source gave one.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The event location the map is centered on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub address: String,
}

impl Anchor {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            address: address.into(),
        }
    }

    /// Anchor for an event, when the event has coordinates.
    pub fn from_event(event: &Event) -> Option<Self> {
        let (latitude, longitude) = event.coordinates()?;
        Some(Self::new(latitude, longitude, &event.name, &event.address))
    }
}

/// Parsed `places_data` block of a places-lookup response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesData {
    pub features: Vec<PlaceFeature>,
    pub total_places: usize,
}

/// Read a places-lookup response without failing.
///
/// Accepts `{ "places_data": { "features": [...], "properties": {...} } }` or
/// a bare feature collection. Features may be flat records or GeoJSON
/// features with `[lon, lat]` coordinates. A response without a feature list
/// yields no places, and features without usable coordinates are skipped.
pub fn parse_places_response(response: &Value) -> PlacesData {
    let data = response.get("places_data").unwrap_or(response);

    let Some(raw_features) = data.get("features").and_then(Value::as_array) else {
        tracing::warn!("malformed places response: no feature list, rendering anchor only");
        return PlacesData::default();
    };

    let features: Vec<PlaceFeature> = raw_features.iter().filter_map(parse_feature).collect();
    if features.len() < raw_features.len() {
        tracing::debug!(
            skipped = raw_features.len() - features.len(),
            "skipped place features without coordinates"
        );
    }

    let total_places = data
        .get("properties")
        .and_then(|p| p.get("total_places"))
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(features.len());

    PlacesData {
        features,
        total_places,
    }
}

fn parse_feature(feature: &Value) -> Option<PlaceFeature> {
    let props = feature.get("properties").unwrap_or(feature);

    let (latitude, longitude) = geometry_coordinates(feature)
        .or_else(|| flat_coordinates(props))
        .or_else(|| flat_coordinates(feature))?;

    let id = string_field(props, &["id", "place_id"])
        .unwrap_or_else(|| format!("{latitude}_{longitude}"));
    let name = string_field(props, &["name"]).unwrap_or_else(|| UNKNOWN.to_string());
    let category = string_field(props, &["category"]).or_else(|| {
        props
            .get("categories")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(Value::as_str)
            .map(String::from)
    });
    let address = string_field(props, &["address", "formatted"]).unwrap_or_default();

    Some(PlaceFeature {
        id,
        name,
        category,
        address,
        latitude,
        longitude,
    })
}

/// GeoJSON point: `geometry.coordinates = [lon, lat]`.
fn geometry_coordinates(feature: &Value) -> Option<(f64, f64)> {
    let coords = feature.get("geometry")?.get("coordinates")?.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some((lat, lon))
}

fn flat_coordinates(record: &Value) -> Option<(f64, f64)> {
    let lat = number_field(record, &["latitude", "lat"])?;
    let lon = number_field(record, &["longitude", "lon", "lng"])?;
    Some((lat, lon))
}

fn number_field(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| record.get(*k).and_then(Value::as_f64))
}

fn string_field(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
