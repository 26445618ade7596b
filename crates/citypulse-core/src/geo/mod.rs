//! Map presentation: nearby places, classification and marker aggregation.
//!
//! Everything here is synchronous and pure. The places lookup itself lives in
//! [`crate::sources::places`]; this module only shapes its output.

pub mod aggregator;
pub mod classifier;
pub mod place;
pub mod summary;

pub use aggregator::{aggregate, MapMarker, ANCHOR_KEY};
pub use classifier::{category_color, classify, Classification, ANCHOR_COLOR, DEFAULT_COLOR};
pub use place::{parse_places_response, Anchor, PlaceFeature, PlacesData};
pub use summary::{BoundingBox, MarkerSummary};
