//! The badge catalog: one data row per badge.
//!
//! Every named badge is a parameterization of one evaluator family, so
//! the catalog is a const table instead of a pile of types. Ids the
//! provider has announced but that have no evaluator here are listed in
//! [`RESERVED_IDS`] and are simply absent from the table.

use crate::badge::{Badge, Evaluator, Fold, MonthlyProgression};
use crate::policy::{Comparison, CounterPolicy, DayWindow, Measure, Period, WindowBoundary};
use std::collections::BTreeSet;
use stride_units::{days, hours, kilometers, meters, miles, minutes, Quantity};

/// Parameters for one badge, selected by family tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FamilySpec {
    /// Lifetime total against a limit.
    Total { measure: Measure, limit: Quantity },
    /// Calendar-period total against a limit.
    CalendarPeriod { measure: Measure, period: Period, limit: Quantity },
    /// Trailing-window total against a limit.
    SlidingWindow { measure: Measure, window_days: i64, boundary: WindowBoundary, limit: Quantity },
    /// Consecutive-day streak of a given length.
    Streak { limit: Quantity },
    /// Distinct qualifying days in a clock window.
    DistinctDays { filter: DayWindow, limit: Quantity },
    /// Distinct days within one calendar month, per year.
    MonthScoped { month: u32, limit: Quantity },
    /// A single run of at least the limit.
    SingleActivity { measure: Measure, limit: Quantity },
    /// A single run of at least the limit, finished under the cutoff.
    DurationGated { cutoff: Quantity, limit: Quantity },
    /// Runs at a qualifying average pace, tallied per month.
    PaceThreshold { target_minutes_per_mile: f64, comparison: Comparison, limit: Quantity },
    /// Runs with steady pace over a minimum distance.
    PaceVariability { tolerance: f64, min_distance: Quantity, limit: Quantity },
    /// Month-over-month improvement streak.
    MonthlyProgression { fold: Fold, required_months: u32, margin: Option<Quantity> },
    /// One activity meeting a fixed bound.
    SingleEvent { measure: Measure, bound: Quantity },
    /// Latched by a profile fact only.
    External,
    /// A gap of at least N days between consecutive runs.
    ActivityGap { min_gap_days: i64 },
    /// Both a fast and a slow tally must reach the requirement.
    DualPace { fast_below: f64, slow_above: f64, required: u32 },
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeSpec {
    pub id: u16,
    pub name: &'static str,
    pub family: FamilySpec,
}

impl BadgeSpec {
    /// Build the badge instance this row describes.
    pub fn instantiate(&self) -> Badge {
        Badge::new(self.id, self.name, self.evaluator())
    }

    fn evaluator(&self) -> Evaluator {
        let counter = |policy: CounterPolicy, limit: Quantity| Evaluator::Counter {
            policy,
            limit,
            baseline: Quantity::zero(limit.unit),
            count: Quantity::zero(limit.unit),
        };
        match self.family {
            FamilySpec::Total { measure, limit } => {
                counter(CounterPolicy::Total { measure }, limit)
            }
            FamilySpec::CalendarPeriod { measure, period, limit } => counter(
                CounterPolicy::CalendarPeriod { measure, period, last_seen: None },
                limit,
            ),
            FamilySpec::SlidingWindow { measure, window_days, boundary, limit } => counter(
                CounterPolicy::SlidingWindow { measure, window_days, boundary, entries: Vec::new() },
                limit,
            ),
            FamilySpec::Streak { limit } => {
                counter(CounterPolicy::Streak { last_seen: None }, limit)
            }
            FamilySpec::DistinctDays { filter, limit } => counter(
                CounterPolicy::DistinctDays { filter, days_seen: BTreeSet::new() },
                limit,
            ),
            FamilySpec::MonthScoped { month, limit } => counter(
                CounterPolicy::MonthScoped { month, last_seen: None, days_seen: BTreeSet::new() },
                limit,
            ),
            FamilySpec::SingleActivity { measure, limit } => {
                counter(CounterPolicy::SingleActivity { measure }, limit)
            }
            FamilySpec::DurationGated { cutoff, limit } => {
                counter(CounterPolicy::DurationGated { cutoff }, limit)
            }
            FamilySpec::PaceThreshold { target_minutes_per_mile, comparison, limit } => counter(
                CounterPolicy::PaceThreshold { target_minutes_per_mile, comparison, last_seen: None },
                limit,
            ),
            FamilySpec::PaceVariability { tolerance, min_distance, limit } => {
                counter(CounterPolicy::PaceVariability { tolerance, min_distance }, limit)
            }
            FamilySpec::MonthlyProgression { fold, required_months, margin } => {
                Evaluator::MonthlyProgression(MonthlyProgression::new(fold, required_months, margin))
            }
            FamilySpec::SingleEvent { measure, bound } => Evaluator::SingleEvent { measure, bound },
            FamilySpec::External => Evaluator::External { fact: None },
            FamilySpec::ActivityGap { min_gap_days } => {
                Evaluator::ActivityGap { min_gap_days, last_seen: None }
            }
            FamilySpec::DualPace { fast_below, slow_above, required } => Evaluator::DualPace {
                fast_below,
                slow_above,
                required,
                fast: 0,
                slow: 0,
            },
        }
    }
}

const fn spec(id: u16, name: &'static str, family: FamilySpec) -> BadgeSpec {
    BadgeSpec { id, name, family }
}

const fn streak(id: u16, name: &'static str, limit_days: f64) -> BadgeSpec {
    spec(id, name, FamilySpec::Streak { limit: days(limit_days) })
}

const fn total_miles(id: u16, name: &'static str, limit: f64) -> BadgeSpec {
    spec(id, name, FamilySpec::Total { measure: Measure::Distance, limit: miles(limit) })
}

const fn total_time(id: u16, name: &'static str, limit: Quantity) -> BadgeSpec {
    spec(id, name, FamilySpec::Total { measure: Measure::Duration, limit })
}

const fn monthly_miles(id: u16, name: &'static str, limit: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::CalendarPeriod {
            measure: Measure::Distance,
            period: Period::Month,
            limit: miles(limit),
        },
    )
}

const fn weekly_miles(id: u16, name: &'static str, limit: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::SlidingWindow {
            measure: Measure::Distance,
            window_days: 7,
            boundary: WindowBoundary::Inclusive,
            limit: miles(limit),
        },
    )
}

const fn single_run(id: u16, name: &'static str, limit: Quantity) -> BadgeSpec {
    spec(id, name, FamilySpec::SingleActivity { measure: Measure::Distance, limit })
}

const fn marathon_under(id: u16, name: &'static str, cutoff_minutes: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::DurationGated { cutoff: minutes(cutoff_minutes), limit: miles(26.2) },
    )
}

const fn pace(id: u16, name: &'static str, target: f64, comparison: Comparison) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::PaceThreshold {
            target_minutes_per_mile: target,
            comparison,
            limit: stride_units::count(10.0),
        },
    )
}

const fn in_it_for(id: u16, name: &'static str, month: u32) -> BadgeSpec {
    spec(id, name, FamilySpec::MonthScoped { month, limit: days(10.0) })
}

const fn progression(
    id: u16,
    name: &'static str,
    fold: Fold,
    required_months: u32,
    margin: Option<Quantity>,
) -> BadgeSpec {
    spec(id, name, FamilySpec::MonthlyProgression { fold, required_months, margin })
}

const fn steady(id: u16, name: &'static str, min_distance_km: f64, tolerance: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::PaceVariability {
            tolerance,
            min_distance: kilometers(min_distance_km),
            limit: stride_units::count(10.0),
        },
    )
}

const fn monthly_climb(id: u16, name: &'static str, limit_meters: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::CalendarPeriod {
            measure: Measure::ElevationRange,
            period: Period::Month,
            limit: meters(limit_meters),
        },
    )
}

const fn single_climb(id: u16, name: &'static str, bound_meters: f64) -> BadgeSpec {
    spec(
        id,
        name,
        FamilySpec::SingleEvent { measure: Measure::ElevationRange, bound: meters(bound_meters) },
    )
}

const fn external(id: u16, name: &'static str) -> BadgeSpec {
    spec(id, name, FamilySpec::External)
}

/// The full catalog, ordered by id.
pub const CATALOG: &[BadgeSpec] = &[
    spec(1, "Early Bird", FamilySpec::DistinctDays { filter: DayWindow::BeforeClock { hour: 7 }, limit: days(10.0) }),
    spec(2, "Night Owl", FamilySpec::DistinctDays { filter: DayWindow::AfterClockAtEnd { hour: 21 }, limit: days(10.0) }),
    spec(3, "Lunch Hour", FamilySpec::DistinctDays { filter: DayWindow::WeekdayBand { start_hour: 12, end_hour: 14 }, limit: days(10.0) }),
    external(4, "Popular"),
    external(5, "OCD"),
    streak(6, "One Mile", 1.0),
    single_run(7, "Marathoner", miles(26.2)),
    single_run(8, "Ultra-Marathoner", kilometers(50.0)),
    single_run(9, "Half Marathoner", miles(13.1)),
    single_run(10, "10ker", kilometers(10.0)),
    marathon_under(11, "Beat a 9yr old", 175.0),
    marathon_under(12, "Pounded Palin", 239.0),
    marathon_under(13, "Past Diddy", 255.0),
    marathon_under(14, "Under Oprah", 269.0),
    marathon_under(15, "Cleared Kate", 329.0),
    streak(16, "5 for 5", 5.0),
    streak(17, "10 for 10", 10.0),
    streak(18, "20 for 20", 20.0),
    streak(19, "50 for 50", 50.0),
    streak(20, "Perfect 100", 100.0),
    total_miles(21, "10 under your belt", 10.0),
    total_miles(22, "20 under your belt", 20.0),
    total_miles(23, "50 under your belt", 50.0),
    total_miles(24, "A century down", 100.0),
    total_miles(25, "Monster 500", 500.0),
    weekly_miles(26, "Solid week", 10.0),
    weekly_miles(27, "Rocked the week", 25.0),
    monthly_miles(28, "Solid month", 30.0),
    monthly_miles(29, "Rocked the month", 75.0),
    monthly_miles(30, "Run nut month", 300.0),
    external(31, "Veteran"),
    external(32, "Guinea pig"),
    single_run(33, "5ker", kilometers(5.0)),
    external(34, "Birthday Run"),
    spec(35, "Corleone", FamilySpec::ActivityGap { min_gap_days: 30 }),
    external(36, "Brought a buddy"),
    external(37, "Got friends"),
    external(38, "Social seven"),
    external(39, "Shares well"),
    external(40, "Pack Leader"),
    total_miles(101, "NYC-Philly", 93.0),
    total_miles(102, "London-Paris", 232.0),
    total_miles(103, "Sydney-Melbourne", 561.0),
    total_miles(104, "NYC-Chicago", 858.0),
    total_miles(105, "Miami-Toronto", 1488.0),
    total_time(106, "Chariots of Fire", minutes(124.0)),
    total_time(107, "Went to work", hours(8.0)),
    total_time(108, "That's a day", hours(24.0)),
    total_time(109, "Week not weak", hours(168.0)),
    total_time(110, "Outlast the Alamo", hours(312.0)),
    pace(111, "Chill runner", 12.0, Comparison::AtLeast),
    pace(112, "Easy runner", 10.0, Comparison::AtLeast),
    pace(113, "Roadrunner", 8.0, Comparison::AtMost),
    pace(114, "Mercury", 7.0, Comparison::AtMost),
    spec(115, "Fast & Slow", FamilySpec::DualPace { fast_below: 8.0, slow_above: 10.0, required: 10 }),
    progression(126, "Stairs", Fold::Sum, 4, None),
    progression(127, "Steep stairs", Fold::Sum, 4, Some(miles(5.0))),
    progression(128, "Long stairs", Fold::Sum, 6, None),
    progression(129, "Long/Steep stairs", Fold::Sum, 6, Some(miles(5.0))),
    progression(130, "Towering stairs", Fold::Sum, 6, Some(miles(10.0))),
    in_it_for(131, "In it for January", 1),
    in_it_for(132, "In it for February", 2),
    in_it_for(133, "In it for March", 3),
    in_it_for(134, "In it for April", 4),
    in_it_for(135, "In it for May", 5),
    in_it_for(136, "In it for June", 6),
    in_it_for(137, "In it for July", 7),
    in_it_for(138, "In it for August", 8),
    in_it_for(139, "In it for September", 9),
    in_it_for(140, "In it for October", 10),
    in_it_for(141, "In it for November", 11),
    in_it_for(142, "In it for December", 12),
    external(143, "Color Picker"),
    total_time(144, "365 days", days(365.0)),
    streak(146, "365 of 365", 365.0),
    external(149, "Stride for life"),
    external(150, "Translator"),
    progression(221, "Four further", Fold::Max, 4, None),
    progression(222, "Six further", Fold::Max, 6, None),
    progression(223, "Four far further", Fold::Max, 4, Some(kilometers(2.0))),
    progression(224, "Six far further", Fold::Max, 6, Some(kilometers(2.0))),
    progression(225, "Further to farther", Fold::Max, 6, Some(kilometers(5.0))),
    steady(226, "Short and steady", 5.0, 0.05),
    steady(227, "Long and steady", 10.0, 0.05),
    steady(228, "Short and solid", 5.0, 0.04),
    steady(229, "Long and solid", 10.0, 0.04),
    steady(230, "Long and rock solid", 10.0, 0.03),
    monthly_climb(236, "Top of Table", 1085.0),
    monthly_climb(237, "Climbed Half Dome", 2694.0),
    monthly_climb(238, "Reached Fitz Roy", 3359.0),
    monthly_climb(239, "Matterhorn master", 4478.0),
    monthly_climb(240, "Conquered Everest", 8848.0),
    single_climb(241, "Towered Pisa", 56.0),
    single_climb(242, "Top of Washington", 169.0),
    single_climb(243, "Over the Eiffel", 301.0),
    single_climb(244, "Above the Burj", 830.0),
    single_climb(245, "To Pike's Peak", 2382.0),
];

/// Ids the provider has assigned to badges this engine cannot evaluate
/// yet. They never appear in [`CATALOG`]; the list exists so a future
/// row lands on the right id.
pub const RESERVED_IDS: &[u16] = &[
    145, 147, 148, 151, 201, 202, 203, 204, 205, 206, 207, 208, 209, 210, 211, 212, 213, 214, 215,
    216, 217, 218, 219, 220, 231, 232, 233, 234, 235,
];

/// Look up a catalog row by id.
pub fn find(id: u16) -> Option<&'static BadgeSpec> {
    CATALOG.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique_and_ordered() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].id < pair[1].id, "{} before {}", pair[0].id, pair[1].id);
        }
    }

    #[test]
    fn test_reserved_ids_absent() {
        for id in RESERVED_IDS {
            assert!(find(*id).is_none(), "reserved id {id} is in the catalog");
        }
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(CATALOG.len(), 97);
    }

    #[test]
    fn test_every_row_instantiates_unacquired() {
        for row in CATALOG {
            let badge = row.instantiate();
            assert_eq!(badge.id(), row.id);
            assert!(!badge.acquired());
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find(35).map(|s| s.name), Some("Corleone"));
        assert!(find(999).is_none());
    }
}
