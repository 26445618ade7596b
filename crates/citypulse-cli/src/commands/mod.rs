pub mod config;
pub mod events;
pub mod map;
pub mod saved;

use clap::Args;
use citypulse_core::{Event, FilterState, Vocabulary};

/// Filter flags shared by `events` and `saved list`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Free-text search over name, description, venue, type and address
    #[arg(long, default_value = "")]
    pub text: String,
    /// Event type (e.g. music, sports)
    #[arg(long = "type", default_value = "")]
    pub event_type: String,
    /// Genre (e.g. rock, comedy)
    #[arg(long, default_value = "")]
    pub genre: String,
    /// Time window: thisWeek, nextMonth, sixMonths or year
    #[arg(long, default_value = "")]
    pub when: String,
}

impl FilterArgs {
    /// The filter state, with values outside the vocabulary dropped.
    pub fn to_state(&self, vocabulary: &Vocabulary) -> FilterState {
        let requested = FilterState::new()
            .with_text(&self.text)
            .with_type(&self.event_type)
            .with_genre(&self.genre)
            .with_time(&self.when);
        let state = requested.clone().sanitized(vocabulary);
        if state != requested {
            tracing::warn!(
                requested = ?requested,
                applied = ?state,
                "ignoring filter values outside the configured vocabulary"
            );
        }
        state
    }
}

/// One line per event: id, name, venue, start time.
pub fn print_event_table<'a>(rows: impl IntoIterator<Item = (&'a str, &'a Event)>) -> usize {
    let mut count = 0;
    for (id, event) in rows {
        println!(
            "{id}\t{}\t{}\t{}",
            event.name,
            event.location,
            event.display_time()
        );
        count += 1;
    }
    count
}
