//! Map marker aggregation for an event and its nearby places.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::classifier::{classify, ANCHOR_COLOR};
use super::place::{Anchor, PlaceFeature};
use crate::event::UNKNOWN;

/// Marker key used for the anchor event.
pub const ANCHOR_KEY: &str = "event_location";

/// Popup type shown for the anchor event.
pub const ANCHOR_TYPE: &str = "Event";

/// A render-ready map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color_class: String,
    pub popup_name: String,
    pub popup_address: String,
    pub popup_type: String,
    pub is_anchor: bool,
}

impl MapMarker {
    fn for_anchor(anchor: &Anchor) -> Self {
        Self {
            key: ANCHOR_KEY.to_string(),
            latitude: anchor.latitude,
            longitude: anchor.longitude,
            color_class: ANCHOR_COLOR.to_string(),
            popup_name: anchor.name.clone(),
            popup_address: anchor.address.clone(),
            popup_type: ANCHOR_TYPE.to_string(),
            is_anchor: true,
        }
    }
}

/// Build the marker list for `anchor` and the places around it.
///
/// The anchor marker always comes first. Places follow in input order, minus
/// any place sitting exactly on the anchor. `None` (lookup not resolved yet,
/// or failed) renders the anchor alone.
pub fn aggregate(anchor: &Anchor, places: Option<&[PlaceFeature]>) -> Vec<MapMarker> {
    let places = places.unwrap_or_default();
    let mut markers = Vec::with_capacity(places.len() + 1);
    markers.push(MapMarker::for_anchor(anchor));

    let mut keys: HashSet<String> = HashSet::with_capacity(places.len() + 1);
    keys.insert(ANCHOR_KEY.to_string());

    for (index, place) in places.iter().enumerate() {
        let class = classify(place, anchor);
        if class.is_anchor_duplicate {
            continue;
        }

        // Keys must stay unique for the renderer even if the source repeats ids.
        let key = if keys.contains(&place.id) {
            format!("{}#{index}", place.id)
        } else {
            place.id.clone()
        };
        keys.insert(key.clone());

        markers.push(MapMarker {
            key,
            latitude: place.latitude,
            longitude: place.longitude,
            color_class: class.color_class.to_string(),
            popup_name: place.name.clone(),
            popup_address: place.address.clone(),
            popup_type: place.category.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            is_anchor: false,
        });
    }

    tracing::debug!(
        places = places.len(),
        markers = markers.len(),
        "aggregated map markers"
    );
    markers
}
