//! Accumulation policies for counter-based badges.
//!
//! A policy answers one question per activity: how much does this run
//! contribute to the badge's accumulator, and must the accumulator be
//! reset to its baseline first. All policy state (last-seen instants,
//! retained window entries, days already counted) lives inside the
//! policy variant, so a badge is just a policy, a limit, and a latch.

use crate::activity::Activity;
use crate::calendar::{different_month, different_year, streak_broken};
use crate::error::EngineError;
use crate::metrics::{average_pace, elevation_range, pace_variability};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use stride_units::{count, days, Quantity};

/// Which measured quantity of an activity a policy accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Distance,
    Duration,
    /// Max minus min of the elevation series.
    ElevationRange,
}

impl Measure {
    /// The measured quantity for one activity.
    pub fn of(self, activity: &Activity) -> Result<Quantity, EngineError> {
        match self {
            Measure::Distance => Ok(activity.distance()),
            Measure::Duration => Ok(activity.duration()),
            Measure::ElevationRange => elevation_range(activity),
        }
    }
}

/// Calendar period that triggers a reset when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Month-and-year boundary.
    Month,
    /// Year boundary.
    Year,
}

/// Which side of a pace target qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Pace must be at most the target (faster runs qualify).
    AtMost,
    /// Pace must be at least the target (slower runs qualify).
    AtLeast,
}

/// Whether an entry sitting exactly on the trailing-window cutoff is
/// retained. `Inclusive` keeps a run exactly N days old in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowBoundary {
    Inclusive,
    Exclusive,
}

/// Clock window a run must fall into to count as a qualifying day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayWindow {
    /// Run starts at or before HH:00 local time.
    BeforeClock { hour: u32 },
    /// Run is still going at or after HH:00 local time.
    AfterClockAtEnd { hour: u32 },
    /// Run starts on a weekday (Mon-Fri) between the two hours inclusive.
    WeekdayBand { start_hour: u32, end_hour: u32 },
}

impl DayWindow {
    fn matches(self, activity: &Activity) -> bool {
        let start = activity.start_time;
        match self {
            DayWindow::BeforeClock { hour } => at_or_before_hour(start, hour),
            DayWindow::AfterClockAtEnd { hour } => activity.end_time().hour() >= hour,
            DayWindow::WeekdayBand { start_hour, end_hour } => {
                start.weekday().number_from_monday() <= 5
                    && start.hour() >= start_hour
                    && at_or_before_hour(start, end_hour)
            }
        }
    }
}

fn at_or_before_hour(instant: DateTime<FixedOffset>, hour: u32) -> bool {
    instant.hour() < hour || (instant.hour() == hour && instant.minute() == 0 && instant.second() == 0)
}

/// One policy step: the contribution of the current activity, and
/// whether the accumulator must return to its baseline before adding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub amount: Quantity,
    pub reset_first: bool,
}

impl Delta {
    fn add(amount: Quantity) -> Self {
        Delta { amount, reset_first: false }
    }

    fn reset_then_add(amount: Quantity) -> Self {
        Delta { amount, reset_first: true }
    }
}

/// The accumulation policy family. Each variant carries its parameters
/// and whatever running state it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterPolicy {
    /// Lifetime total of a measured quantity. Never resets.
    Total { measure: Measure },

    /// Total within the current calendar period; resets when the period
    /// of the current activity differs from the previous one.
    CalendarPeriod {
        measure: Measure,
        period: Period,
        last_seen: Option<DateTime<FixedOffset>>,
    },

    /// Sum over a trailing window of days. Recomputed every call: the
    /// accumulator always mirrors the current window, never a running
    /// total.
    SlidingWindow {
        measure: Measure,
        window_days: i64,
        boundary: WindowBoundary,
        entries: Vec<(DateTime<FixedOffset>, Quantity)>,
    },

    /// One day per run; resets when the gap since the previous run
    /// breaks the streak, then counts the current day.
    Streak { last_seen: Option<DateTime<FixedOffset>> },

    /// One day per distinct calendar date whose run falls in the clock
    /// window. A second qualifying run on the same date contributes
    /// nothing.
    DistinctDays {
        filter: DayWindow,
        days_seen: BTreeSet<NaiveDate>,
    },

    /// One day per distinct day-of-month while the run falls in the
    /// configured month; state resets when the year changes.
    MonthScoped {
        month: u32,
        last_seen: Option<DateTime<FixedOffset>>,
        days_seen: BTreeSet<u32>,
    },

    /// The accumulator mirrors a single run's quantity: reset to the
    /// baseline before every add.
    SingleActivity { measure: Measure },

    /// A single run's distance, counted only when the run finished
    /// under the duration cutoff. Mirrors one run, like
    /// `SingleActivity`.
    DurationGated { cutoff: Quantity },

    /// One tally per run whose average pace compares favorably against
    /// the target; the tally resets when the calendar month changes.
    PaceThreshold {
        target_minutes_per_mile: f64,
        comparison: Comparison,
        last_seen: Option<DateTime<FixedOffset>>,
    },

    /// One tally per sufficiently long run whose pace variability is
    /// within tolerance. Never resets.
    PaceVariability {
        tolerance: f64,
        min_distance: Quantity,
    },
}

impl CounterPolicy {
    /// Compute the current activity's contribution, updating policy
    /// state as a side effect.
    pub fn increment(&mut self, activity: &Activity) -> Result<Delta, EngineError> {
        let start = activity.start_time;
        match self {
            CounterPolicy::Total { measure } => Ok(Delta::add(measure.of(activity)?)),

            CounterPolicy::CalendarPeriod { measure, period, last_seen } => {
                let new_period = match period {
                    Period::Month => different_month(*last_seen, start),
                    Period::Year => different_year(*last_seen, start),
                };
                let amount = measure.of(activity)?;
                *last_seen = Some(start);
                Ok(if new_period { Delta::reset_then_add(amount) } else { Delta::add(amount) })
            }

            CounterPolicy::SlidingWindow { measure, window_days, boundary, entries } => {
                let amount = measure.of(activity)?;
                let earliest = start - Duration::days(*window_days);
                match boundary {
                    WindowBoundary::Inclusive => entries.retain(|(at, _)| *at >= earliest),
                    WindowBoundary::Exclusive => entries.retain(|(at, _)| *at > earliest),
                }
                entries.push((start, amount));

                let mut total = Quantity::zero(entries[0].1.unit);
                for (_, q) in entries.iter() {
                    total = total.try_add(*q)?;
                }
                Ok(Delta::reset_then_add(total))
            }

            CounterPolicy::Streak { last_seen } => {
                let broken = streak_broken(*last_seen, start);
                *last_seen = Some(start);
                Ok(if broken { Delta::reset_then_add(days(1.0)) } else { Delta::add(days(1.0)) })
            }

            CounterPolicy::DistinctDays { filter, days_seen } => {
                let date = start.date_naive();
                if filter.matches(activity) && days_seen.insert(date) {
                    Ok(Delta::add(days(1.0)))
                } else {
                    Ok(Delta::add(days(0.0)))
                }
            }

            CounterPolicy::MonthScoped { month, last_seen, days_seen } => {
                if start.month() != *month {
                    return Ok(Delta::add(days(0.0)));
                }
                let new_year = different_year(*last_seen, start);
                if new_year {
                    days_seen.clear();
                }
                *last_seen = Some(start);
                let counted = days_seen.insert(start.day());
                Ok(Delta {
                    amount: days(if counted { 1.0 } else { 0.0 }),
                    reset_first: new_year,
                })
            }

            CounterPolicy::SingleActivity { measure } => {
                Ok(Delta::reset_then_add(measure.of(activity)?))
            }

            CounterPolicy::DurationGated { cutoff } => {
                let under = activity.duration().try_cmp(*cutoff)? == std::cmp::Ordering::Less;
                let amount = if under { activity.distance() } else { Quantity::zero(activity.distance().unit) };
                Ok(Delta::reset_then_add(amount))
            }

            CounterPolicy::PaceThreshold { target_minutes_per_mile, comparison, last_seen } => {
                let new_month = different_month(*last_seen, start);
                *last_seen = Some(start);
                let pace = average_pace(activity);
                let qualifies = match comparison {
                    Comparison::AtMost => pace <= *target_minutes_per_mile,
                    Comparison::AtLeast => pace >= *target_minutes_per_mile,
                };
                Ok(Delta {
                    amount: count(if qualifies { 1.0 } else { 0.0 }),
                    reset_first: new_month,
                })
            }

            CounterPolicy::PaceVariability { tolerance, min_distance } => {
                let far_enough = activity.distance().at_least(*min_distance)?;
                let steady = match pace_variability(activity)? {
                    Some(v) => v <= *tolerance,
                    // Fewer than two samples: variability undefined.
                    None => false,
                };
                Ok(Delta::add(count(if far_enough && steady { 1.0 } else { 0.0 })))
            }
        }
    }
}
