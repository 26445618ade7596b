//! Marker counts and map bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregator::MapMarker;
use super::classifier::top_level;

/// Meters per degree of latitude, rounded.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Per-category counts of the nearby-place markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSummary {
    /// Places shown, not counting the anchor.
    pub total_places: usize,
    /// Count by top-level category.
    pub categories: BTreeMap<String, usize>,
}

impl MarkerSummary {
    pub fn from_markers(markers: &[MapMarker]) -> Self {
        let mut summary = Self::default();
        for marker in markers.iter().filter(|m| !m.is_anchor) {
            summary.total_places += 1;
            *summary
                .categories
                .entry(top_level(&marker.popup_type).to_string())
                .or_insert(0) += 1;
        }
        summary
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Approximate box around a center point for a search radius in meters.
    ///
    /// The longitude span is divided by `|lat / 90|`, and left unscaled on the
    /// equator.
    pub fn around(latitude: f64, longitude: f64, radius_m: f64) -> Self {
        let lat_offset = radius_m / METERS_PER_DEGREE;
        let lon_offset = if latitude == 0.0 {
            lat_offset
        } else {
            lat_offset / (latitude / 90.0).abs()
        };

        Self {
            west: longitude - lon_offset,
            south: latitude - lat_offset,
            east: longitude + lon_offset,
            north: latitude + lat_offset,
        }
    }

    /// Smallest box containing every marker. `None` for an empty list.
    pub fn enclosing(markers: &[MapMarker]) -> Option<Self> {
        let first = markers.first()?;
        let start = Self {
            west: first.longitude,
            south: first.latitude,
            east: first.longitude,
            north: first.latitude,
        };
        Some(markers.iter().skip(1).fold(start, |b, m| Self {
            west: b.west.min(m.longitude),
            south: b.south.min(m.latitude),
            east: b.east.max(m.longitude),
            north: b.north.max(m.latitude),
        }))
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }
}
