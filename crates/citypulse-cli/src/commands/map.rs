use clap::Args;
use serde::Serialize;

use citypulse_core::geo::BoundingBox;
use citypulse_core::{
    aggregate, Anchor, Config, EventSource, MapMarker, MarkerSummary, NearbyRequest, PlaceFeature, PlacesClient,
};

#[derive(Args)]
pub struct MapArgs {
    /// City the event belongs to
    #[arg(long)]
    pub city: String,
    /// Event id (as shown by `citypulse events`)
    #[arg(long)]
    pub event: String,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct MapView {
    markers: Vec<MapMarker>,
    summary: MarkerSummary,
    bounds: Option<BoundingBox>,
    /// Viewport covering the search radius around the event.
    search_area: BoundingBox,
}

impl MapView {
    fn build(anchor: &Anchor, places: Option<&[PlaceFeature]>, radius_m: u32) -> Self {
        let markers = aggregate(anchor, places);
        Self {
            summary: MarkerSummary::from_markers(&markers),
            bounds: BoundingBox::enclosing(&markers),
            search_area: BoundingBox::around(anchor.latitude, anchor.longitude, f64::from(radius_m)),
            markers,
        }
    }
}

pub async fn run(args: MapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let events = EventSource::from_config(&config.api)?
        .fetch_events(&args.city)
        .await?;

    let event = events
        .get(&args.event)
        .ok_or_else(|| format!("event not found in {}: {}", args.city, args.event))?;
    let anchor = Anchor::from_event(event)
        .ok_or_else(|| format!("event has no coordinates: {}", args.event))?;
    let request = NearbyRequest::for_event(event, &config.places)
        .ok_or_else(|| format!("event has no coordinates: {}", args.event))?;

    let places = PlacesClient::from_config(&config.api)?
        .nearby_or_none(&request)
        .await;
    if places.is_none() {
        eprintln!("warning: nearby places unavailable, showing the event only");
    }

    let view = MapView::build(
        &anchor,
        places.as_ref().map(|p| p.features.as_slice()),
        config.places.radius,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for marker in &view.markers {
        println!(
            "{}\t{:.5},{:.5}\t{}\t{}\t{}",
            marker.key,
            marker.latitude,
            marker.longitude,
            marker.color_class,
            marker.popup_name,
            marker.popup_type
        );
    }
    let area = view.search_area;
    println!(
        "search area: {:.5},{:.5} to {:.5},{:.5}",
        area.south, area.west, area.north, area.east
    );
    println!("{} nearby places", view.summary.total_places);
    for (category, count) in &view.summary.categories {
        println!("  {category}: {count}");
    }
    Ok(())
}
