//! Calendar-boundary predicates.
//!
//! Reset policies ask two questions about consecutive activity start
//! times: did we cross into a new month or year, and did a day streak
//! break. `None` on the left means "no previous activity", which always
//! counts as a boundary so the first activity opens a fresh period.

use chrono::{DateTime, Datelike, Duration, FixedOffset};

/// True when `next` falls in a different calendar year than `prev`,
/// or there is no previous activity.
pub fn different_year(prev: Option<DateTime<FixedOffset>>, next: DateTime<FixedOffset>) -> bool {
    match prev {
        None => true,
        Some(prev) => prev.year() != next.year(),
    }
}

/// True when `next` falls in a different calendar month than `prev`
/// (month or year differs), or there is no previous activity.
pub fn different_month(prev: Option<DateTime<FixedOffset>>, next: DateTime<FixedOffset>) -> bool {
    match prev {
        None => true,
        Some(prev) => prev.month() != next.month() || prev.year() != next.year(),
    }
}

/// True when the gap between consecutive runs breaks a day streak:
/// more than one day apart, or exactly one day plus any sub-day amount.
/// No previous run never breaks a streak.
pub fn streak_broken(prev: Option<DateTime<FixedOffset>>, next: DateTime<FixedOffset>) -> bool {
    match prev {
        None => false,
        Some(prev) => next.signed_duration_since(prev) > Duration::days(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_units::parse_local;

    fn at(s: &str) -> DateTime<FixedOffset> {
        parse_local(s).unwrap()
    }

    #[test]
    fn test_no_previous_is_a_boundary() {
        let d = at("2016-03-15T10:00:00+00:00");
        assert!(different_year(None, d));
        assert!(different_month(None, d));
        assert!(!streak_broken(None, d));
    }

    #[test]
    fn test_different_month() {
        let feb = at("2016-02-29T10:00:00+00:00");
        let mar = at("2016-03-01T10:00:00+00:00");
        assert!(different_month(Some(feb), mar));
        assert!(!different_month(Some(mar), at("2016-03-31T23:00:00+00:00")));
        // Same month number, different year.
        assert!(different_month(
            Some(at("2015-03-01T10:00:00+00:00")),
            at("2016-03-01T10:00:00+00:00")
        ));
    }

    #[test]
    fn test_different_year() {
        assert!(different_year(
            Some(at("2015-12-31T23:59:00+00:00")),
            at("2016-01-01T00:01:00+00:00")
        ));
        assert!(!different_year(
            Some(at("2016-01-01T00:01:00+00:00")),
            at("2016-12-31T23:59:00+00:00")
        ));
    }

    #[test]
    fn test_streak_exactly_one_day_holds() {
        let d1 = at("2016-05-01T08:00:00+00:00");
        let d2 = at("2016-05-02T08:00:00+00:00");
        assert!(!streak_broken(Some(d1), d2));
    }

    #[test]
    fn test_streak_one_day_plus_a_second_breaks() {
        let d1 = at("2016-05-01T08:00:00+00:00");
        let d2 = at("2016-05-02T08:00:01+00:00");
        assert!(streak_broken(Some(d1), d2));
    }

    #[test]
    fn test_streak_two_days_breaks() {
        let d1 = at("2016-05-01T08:00:00+00:00");
        let d3 = at("2016-05-03T08:00:00+00:00");
        assert!(streak_broken(Some(d1), d3));
    }

    #[test]
    fn test_streak_same_day_holds() {
        let morning = at("2016-05-01T08:00:00+00:00");
        let evening = at("2016-05-01T20:00:00+00:00");
        assert!(!streak_broken(Some(morning), evening));
    }
}
