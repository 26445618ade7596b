//! Single-event predicate for a [`FilterState`].

use chrono::{DateTime, Utc};

use super::time_window::in_range_at;
use super::FilterState;
use crate::event::Event;

/// Whether `event` satisfies every constraint in `filter`, evaluated now.
pub fn matches(event: &Event, filter: &FilterState) -> bool {
    matches_at(event, filter, Utc::now())
}

/// [`matches`] with an explicit "now" for the time window.
pub fn matches_at(event: &Event, filter: &FilterState, now: DateTime<Utc>) -> bool {
    Matcher::new(filter, now).matches(event)
}

/// A filter prepared for repeated evaluation.
///
/// The lowercased search text is computed once, so a filter pass over `n`
/// events stays O(n).
pub(crate) struct Matcher<'a> {
    filter: &'a FilterState,
    needle: String,
    now: DateTime<Utc>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(filter: &'a FilterState, now: DateTime<Utc>) -> Self {
        Self {
            filter,
            needle: filter.text.to_lowercase(),
            now,
        }
    }

    pub(crate) fn matches(&self, event: &Event) -> bool {
        self.text_matches(event)
            && category_matches(&self.filter.event_type, &event.event_type)
            && category_matches(&self.filter.genre, &event.genre)
            && in_range_at(Some(&event.time), &self.filter.time, self.now)
    }

    fn text_matches(&self, event: &Event) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        [
            &event.name,
            &event.description,
            &event.location,
            &event.event_type,
            &event.address,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Case-sensitive equality, or no constraint when `wanted` is empty.
fn category_matches(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted == actual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEvent;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn concert() -> Event {
        RawEvent {
            id: Some("c1".into()),
            name: Some("Summer Rock Fest".into()),
            description: Some("Outdoor show with local bands".into()),
            location: Some("Central Park".into()),
            address: Some("5th Ave, New York".into()),
            event_type: Some("music".into()),
            genre: Some("rock".into()),
            time: Some((now() + Duration::days(3)).to_rfc3339()),
            ..Default::default()
        }
        .normalize()
    }

    #[test]
    fn empty_filter_matches() {
        assert!(matches_at(&concert(), &FilterState::new(), now()));
    }

    #[test]
    fn text_is_case_insensitive_across_fields() {
        let event = concert();
        for query in ["ROCK FEST", "local bands", "central", "MUSIC", "new york"] {
            let filter = FilterState::new().with_text(query);
            assert!(matches_at(&event, &filter, now()), "query {query:?}");
        }
        let filter = FilterState::new().with_text("opera");
        assert!(!matches_at(&event, &filter, now()));
    }

    #[test]
    fn genre_is_not_searched_by_text() {
        let mut event = concert();
        event.name = "Evening".into();
        event.description = "Quiet".into();
        event.genre = "classical".into();
        let filter = FilterState::new().with_text("classical");
        assert!(!matches_at(&event, &filter, now()));
    }

    #[test]
    fn categories_are_case_sensitive() {
        let event = concert();
        assert!(matches_at(&event, &FilterState::new().with_type("music"), now()));
        assert!(!matches_at(&event, &FilterState::new().with_type("Music"), now()));
        assert!(matches_at(&event, &FilterState::new().with_genre("rock"), now()));
        assert!(!matches_at(&event, &FilterState::new().with_genre("comedy"), now()));
    }

    #[test]
    fn time_window_applies() {
        let event = concert();
        assert!(matches_at(&event, &FilterState::new().with_time("thisWeek"), now()));

        let mut past = concert();
        past.time = (now() - Duration::days(2)).to_rfc3339();
        assert!(!matches_at(&past, &FilterState::new().with_time("thisWeek"), now()));
    }

    #[test]
    fn all_predicates_must_hold() {
        let event = concert();
        let filter = FilterState::new()
            .with_text("park")
            .with_type("music")
            .with_genre("hiphop");
        assert!(!matches_at(&event, &filter, now()));
    }

    #[test]
    fn unknown_time_passes_any_window() {
        let mut event = concert();
        event.time = crate::event::UNKNOWN.into();
        assert!(matches_at(&event, &FilterState::new().with_time("year"), now()));
    }
}
