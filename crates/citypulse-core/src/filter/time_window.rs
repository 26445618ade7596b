//! Relative time-window classification.
//!
//! Decides whether an event's start time falls between "now" and the end of a
//! named window. The classifier is fail-open: a missing window, a missing
//! timestamp, an unparseable timestamp or an unknown window name all count
//! as "in range".

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Named forward-looking window relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeWindow {
    /// The next 7 days.
    ThisWeek,
    /// The next calendar month.
    NextMonth,
    /// The next 6 calendar months.
    SixMonths,
    /// The next 12 calendar months.
    Year,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::ThisWeek,
        TimeWindow::NextMonth,
        TimeWindow::SixMonths,
        TimeWindow::Year,
    ];

    /// Look up a window by its filter value. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "thisWeek" => Some(Self::ThisWeek),
            "nextMonth" | "month" => Some(Self::NextMonth),
            "sixMonths" | "6months" => Some(Self::SixMonths),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// Canonical filter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisWeek => "thisWeek",
            Self::NextMonth => "nextMonth",
            Self::SixMonths => "sixMonths",
            Self::Year => "year",
        }
    }

    /// Inclusive upper bound of the window starting at `now`.
    pub fn end_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::ThisWeek => now + Duration::days(7),
            Self::NextMonth => add_calendar_months(now, 1),
            Self::SixMonths => add_calendar_months(now, 6),
            Self::Year => add_calendar_months(now, 12),
        }
    }

    /// Whether `at` lies in `[now, end_from(now)]`.
    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now <= at && at <= self.end_from(now)
    }
}

/// Add calendar months, rolling day-of-month overflow into the next month.
///
/// Jan 31 + 1 month is Mar 3 (Feb 28 days + 3), not Feb 28. Time of day is
/// preserved.
pub fn add_calendar_months(at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let total = i64::from(at.year()) * 12 + i64::from(at.month0()) + i64::from(months);
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    let date = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
        .and_then(|first| first.checked_add_signed(Duration::days(i64::from(at.day()) - 1)));
    match date {
        Some(date) => date.and_time(at.time()).and_utc(),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Parse an event timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T19:30:00Z`, `...-05:00`), naive date-times
/// (`2025-03-01T19:30:00`, `2025-03-01 19:30`) read as UTC, and bare dates
/// (`2025-03-01`) read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let value = value.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(at.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| ParseError(value.to_string()))
}

/// Whether `timestamp` falls in `window`, measured from the current time.
pub fn in_range(timestamp: Option<&str>, window: &str) -> bool {
    in_range_at(timestamp, window, Utc::now())
}

/// [`in_range`] with an explicit "now".
pub fn in_range_at(timestamp: Option<&str>, window: &str, now: DateTime<Utc>) -> bool {
    if window.is_empty() {
        return true;
    }
    let Some(timestamp) = timestamp.filter(|t| !t.is_empty()) else {
        return true;
    };
    let Some(window) = TimeWindow::parse(window) else {
        return true;
    };

    match parse_timestamp(timestamp) {
        Ok(at) => window.contains(at, now),
        Err(err) => {
            tracing::trace!(%err, "treating unparseable time as in range");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn rfc(at: DateTime<Utc>) -> String {
        at.to_rfc3339()
    }

    #[test]
    fn empty_window_or_timestamp_is_in_range() {
        assert!(in_range_at(Some("2000-01-01T00:00:00Z"), "", now()));
        assert!(in_range_at(None, "thisWeek", now()));
        assert!(in_range_at(Some(""), "thisWeek", now()));
    }

    #[test]
    fn unparseable_timestamp_fails_open() {
        assert!(in_range_at(Some("not-a-date"), "thisWeek", now()));
        assert!(in_range_at(Some("Unknown"), "year", now()));
        assert!(in_range(Some("not-a-date"), "thisWeek"));
    }

    #[test]
    fn unknown_window_does_not_filter() {
        assert!(in_range_at(Some("1999-01-01T00:00:00Z"), "fortnight", now()));
    }

    #[test]
    fn past_events_are_excluded() {
        let yesterday = now() - Duration::days(1);
        assert!(!in_range_at(Some(&rfc(yesterday)), "thisWeek", now()));
        assert!(!in_range_at(Some(&rfc(yesterday)), "year", now()));
    }

    #[test]
    fn this_week_is_seven_days_inclusive() {
        assert!(in_range_at(Some(&rfc(now())), "thisWeek", now()));
        assert!(in_range_at(Some(&rfc(now() + Duration::days(7))), "thisWeek", now()));
        assert!(!in_range_at(
            Some(&rfc(now() + Duration::days(7) + Duration::seconds(1))),
            "thisWeek",
            now()
        ));
    }

    #[test]
    fn far_future_is_outside_year() {
        assert!(!in_range_at(Some("2099-01-01T00:00:00Z"), "year", now()));
        assert!(!in_range(Some("2099-01-01T00:00:00Z"), "year"));
    }

    #[test]
    fn six_month_boundary() {
        let end = add_calendar_months(now(), 6);
        let just_inside = end - Duration::seconds(1);
        let outside = end + Duration::days(1);
        assert!(in_range_at(Some(&rfc(just_inside)), "sixMonths", now()));
        assert!(in_range_at(Some(&rfc(end)), "sixMonths", now()));
        assert!(!in_range_at(Some(&rfc(outside)), "sixMonths", now()));
    }

    #[test]
    fn month_aliases() {
        let in_three_weeks = rfc(now() + Duration::days(21));
        assert!(in_range_at(Some(&in_three_weeks), "month", now()));
        assert!(in_range_at(Some(&in_three_weeks), "nextMonth", now()));
        assert!(!in_range_at(Some(&in_three_weeks), "thisWeek", now()));
        assert_eq!(TimeWindow::parse("6months"), Some(TimeWindow::SixMonths));
    }

    #[test]
    fn calendar_months_roll_over_short_months() {
        let jan31 = Utc.with_ymd_and_hms(2025, 1, 31, 8, 30, 0).unwrap();
        assert_eq!(
            add_calendar_months(jan31, 1),
            Utc.with_ymd_and_hms(2025, 3, 3, 8, 30, 0).unwrap()
        );

        let leap = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(
            add_calendar_months(leap, 1),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );

        let aug = Utc.with_ymd_and_hms(2025, 8, 31, 0, 0, 0).unwrap();
        assert_eq!(
            add_calendar_months(aug, 6),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn calendar_months_cross_year_boundaries() {
        let nov = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
        assert_eq!(
            add_calendar_months(nov, 12),
            Utc.with_ymd_and_hms(2026, 11, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            add_calendar_months(nov, 3),
            Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn calendar_months_saturate_near_the_end_of_time() {
        let last_year = NaiveDate::MAX.year();
        let oct_31 = NaiveDate::from_ymd_opt(last_year, 10, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        let dec_1 = NaiveDate::from_ymd_opt(last_year, 12, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(add_calendar_months(oct_31, 1), dec_1);
        assert_eq!(add_calendar_months(oct_31, 3), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_calendar_months(DateTime::<Utc>::MAX_UTC, 6), DateTime::<Utc>::MAX_UTC);
        assert!(!in_range_at(Some("2025-03-01"), "year", DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn parses_supported_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 19, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-01T19:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-01T14:30:00-05:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-01T19:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-01 19:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-03-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("7 PM").is_err());
    }
}
