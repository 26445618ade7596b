//! Collection-wide filter pass.

use chrono::{DateTime, Utc};

use super::matcher::Matcher;
use super::FilterState;
use crate::event::{Event, EventCollection};

/// Entries of `events` matching `state`, in source order.
pub fn filter<'a>(events: &'a EventCollection, state: &FilterState) -> Vec<(&'a str, &'a Event)> {
    filter_at(events, state, Utc::now())
}

/// [`filter`] with an explicit "now" for the time window.
pub fn filter_at<'a>(
    events: &'a EventCollection,
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<(&'a str, &'a Event)> {
    let matcher = Matcher::new(state, now);
    let matched: Vec<_> = events
        .iter()
        .filter(|(_, event)| matcher.matches(event))
        .map(|(id, event)| (id.as_str(), event))
        .collect();

    tracing::debug!(
        total = events.len(),
        matched = matched.len(),
        "filter pass"
    );
    matched
}

/// Holds the current filter state for a view of events.
///
/// The engine never keeps the events themselves; callers pass a borrowed
/// collection on each [`apply`](Self::apply).
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    state: FilterState,
}

impl FilterEngine {
    pub fn new(state: FilterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Swap in a complete new state, returning the previous one.
    pub fn replace_state(&mut self, state: FilterState) -> FilterState {
        std::mem::replace(&mut self.state, state)
    }

    /// Reset every field to "no constraint".
    pub fn clear(&mut self) -> FilterState {
        self.replace_state(FilterState::default())
    }

    pub fn apply<'a>(&self, events: &'a EventCollection) -> Vec<(&'a str, &'a Event)> {
        filter(events, &self.state)
    }

    pub fn apply_at<'a>(
        &self,
        events: &'a EventCollection,
        now: DateTime<Utc>,
    ) -> Vec<(&'a str, &'a Event)> {
        filter_at(events, &self.state, now)
    }
}
