//! Tests for the filter engine.

#[cfg(test)]
mod tests {
    use super::super::engine::*;
    use crate::event::{normalize_all, EventCollection, RawEvent};
    use crate::filter::FilterState;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw(id: &str, name: &str, event_type: &str, time: &str) -> RawEvent {
        RawEvent {
            id: Some(id.into()),
            name: Some(name.into()),
            event_type: Some(event_type.into()),
            time: Some(time.into()),
            ..Default::default()
        }
    }

    fn sample() -> EventCollection {
        let soon = (now() + Duration::days(2)).to_rfc3339();
        let later = (now() + Duration::days(90)).to_rfc3339();
        let past = (now() - Duration::days(1)).to_rfc3339();
        normalize_all(vec![
            raw("3", "Jazz Brunch", "music", &soon),
            raw("1", "Derby Day", "sports", &later),
            raw("2", "Hamlet", "theater", &past),
            raw("4", "Mystery Gig", "music", "Unknown"),
        ])
    }

    #[test]
    fn empty_collection_yields_empty_result() {
        let events = EventCollection::new();
        assert!(filter_at(&events, &FilterState::new().with_text("x"), now()).is_empty());
        assert!(filter_at(&events, &FilterState::new(), now()).is_empty());
    }

    #[test]
    fn results_keep_source_order() {
        let events = sample();
        let ids: Vec<_> = filter_at(&events, &FilterState::new().with_type("music"), now())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn time_window_keeps_unknown_times() {
        let events = sample();
        let ids: Vec<_> = filter_at(&events, &FilterState::new().with_time("thisWeek"), now())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn engine_replaces_whole_state() {
        let events = sample();
        let mut engine = FilterEngine::default();
        assert_eq!(engine.apply_at(&events, now()).len(), 4);

        let previous = engine.replace_state(FilterState::new().with_text("derby"));
        assert!(previous.is_empty());
        let hits = engine.apply_at(&events, now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1.name, "Derby Day");

        engine.clear();
        assert!(engine.state().is_empty());
    }

    fn arb_raw() -> impl Strategy<Value = RawEvent> {
        (
            "[a-z0-9]{1,8}",
            proptest::option::of("[A-Za-z ]{0,12}"),
            proptest::option::of("(music|sports|theater|other)"),
            proptest::option::of(prop_oneof![
                Just("Unknown".to_string()),
                Just("not-a-date".to_string()),
                (0i64..800).prop_map(|d| (now() + Duration::days(d - 400)).to_rfc3339()),
            ]),
        )
            .prop_map(|(id, name, event_type, time)| RawEvent {
                id: Some(id),
                name,
                event_type,
                time,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn empty_filter_returns_everything_in_order(raws in proptest::collection::vec(arb_raw(), 0..40)) {
            let events = normalize_all(raws);
            let result = filter_at(&events, &FilterState::new(), now());
            let got: Vec<&str> = result.iter().map(|(id, _)| *id).collect();
            let expected: Vec<&str> = events.keys().map(String::as_str).collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn empty_time_ignores_event_time(
            raws in proptest::collection::vec(arb_raw(), 0..40),
            event_type in prop_oneof![Just(String::new()), Just("music".to_string()), Just("sports".to_string())],
        ) {
            let events = normalize_all(raws);
            let mut scrambled = events.clone();
            for event in scrambled.values_mut() {
                event.time = "garbage".into();
            }
            let state = FilterState::new().with_type(event_type);
            let a: Vec<&str> = filter_at(&events, &state, now()).iter().map(|(id, _)| *id).collect();
            let b: Vec<&str> = filter_at(&scrambled, &state, now()).iter().map(|(id, _)| *id).collect();
            prop_assert_eq!(a, b);
        }
    }
}
