//! Place classification: marker color and anchor deduplication.

use super::place::{Anchor, PlaceFeature};

/// Marker color for the anchor event.
pub const ANCHOR_COLOR: &str = "#6488ea";

/// Marker color for categories not in [`CATEGORY_COLORS`].
pub const DEFAULT_COLOR: &str = "#28a745";

/// Top-level place category to marker color.
pub const CATEGORY_COLORS: [(&str, &str); 6] = [
    ("catering", "#ffb52b"),
    ("entertainment", "#cf3e56"),
    ("building", "#95a5a6"),
    ("tourism", "#3498db"),
    ("highway", "#9c9c9c"),
    ("populated_place", "#9b59b6"),
];

/// Outcome of classifying one place against the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The place sits exactly on the anchor and must not get its own marker.
    pub is_anchor_duplicate: bool,
    pub color_class: &'static str,
}

pub fn classify(place: &PlaceFeature, anchor: &Anchor) -> Classification {
    Classification {
        is_anchor_duplicate: is_anchor_duplicate(place, anchor),
        color_class: category_color(place.category.as_deref()),
    }
}

/// Exact coordinate equality on the raw values, no tolerance radius.
#[allow(clippy::float_cmp)]
pub fn is_anchor_duplicate(place: &PlaceFeature, anchor: &Anchor) -> bool {
    place.latitude == anchor.latitude && place.longitude == anchor.longitude
}

/// Color for a category. Dotted categories use their first segment, so
/// `catering.restaurant` is colored as `catering`.
pub fn category_color(category: Option<&str>) -> &'static str {
    let Some(category) = category else {
        return DEFAULT_COLOR;
    };
    let top = top_level(category);
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == top)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// First segment of a dotted category.
pub fn top_level(category: &str) -> &str {
    category.split('.').next().unwrap_or(category)
}
