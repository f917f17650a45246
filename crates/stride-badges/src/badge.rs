//! Badges: one achievement criterion plus its acquisition latch.
//!
//! A badge wraps one evaluator. The counter family covers everything
//! expressible as "accumulate and compare against a limit"; the other
//! evaluators are the bespoke state machines: month-over-month
//! progression, single-event thresholds, externally-latched facts, the
//! gap badge, and the dual pace counter.

use crate::activity::{Activity, ProfileFact};
use crate::calendar::different_month;
use crate::error::EngineError;
use crate::metrics::average_pace;
use crate::policy::{CounterPolicy, Measure};
use chrono::{DateTime, FixedOffset, Utc};
use std::cmp::Ordering;
use stride_units::{miles, Quantity, Unit};
use tracing::{debug, info};

/// The one-way latch. Activity-driven acquisition records both the
/// triggering activity and its start time; externally-latched badges
/// record only a timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acquisition {
    triggering_activity_id: Option<i64>,
    earned_at: Option<DateTime<FixedOffset>>,
}

impl Acquisition {
    pub fn acquired(&self) -> bool {
        self.triggering_activity_id.is_some() || self.earned_at.is_some()
    }

    /// Latch from an activity. First caller wins; later calls are no-ops.
    fn acquire(&mut self, badge: &'static str, activity_id: i64, earned_at: DateTime<FixedOffset>) {
        if self.acquired() {
            return;
        }
        self.triggering_activity_id = Some(activity_id);
        self.earned_at = Some(earned_at);
        info!(badge, activity_id, %earned_at, "badge acquired");
    }

    /// Latch from a profile fact: timestamp only, no triggering activity.
    fn acquire_external(&mut self, badge: &'static str, earned_at: DateTime<Utc>) {
        if self.acquired() {
            return;
        }
        self.earned_at = Some(earned_at.fixed_offset());
        info!(badge, %earned_at, "badge acquired from profile fact");
    }
}

/// Whether a month's aggregate is the sum of its runs or its longest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    Sum,
    Max,
}

/// Rewards N consecutive months where the monthly aggregate beats the
/// previous month's, optionally by a minimum margin. One rolling pair of
/// period values plus a streak counter; O(1) per activity.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyProgression {
    fold: Fold,
    required_months: u32,
    margin: Option<Quantity>,
    current: Quantity,
    previous: Quantity,
    stepped: bool,
    consecutive_months: u32,
    candidate: Option<(i64, DateTime<FixedOffset>)>,
    last_seen: Option<DateTime<FixedOffset>>,
}

impl MonthlyProgression {
    pub fn new(fold: Fold, required_months: u32, margin: Option<Quantity>) -> Self {
        Self {
            fold,
            required_months,
            margin,
            current: Quantity::zero(Unit::Miles),
            previous: Quantity::zero(Unit::Miles),
            stepped: false,
            consecutive_months: 0,
            candidate: None,
            last_seen: None,
        }
    }

    fn add_activity(
        &mut self,
        name: &'static str,
        activity: &Activity,
        acquisition: &mut Acquisition,
    ) -> Result<(), EngineError> {
        let start = activity.start_time;

        // Walking into a new month closes out the one that just ended.
        if different_month(self.last_seen, start) {
            if self.stepped {
                self.consecutive_months += 1;
                debug!(badge = name, months = self.consecutive_months, "month stepped up");
            } else {
                self.consecutive_months = 0;
            }
            self.stepped = false;
            self.previous = self.current;
            self.current = Quantity::zero(Unit::Miles);
        }

        // The provider rounds each run to hundredths of a mile before
        // aggregating; match that so month totals agree.
        let run_miles = activity.distance().to(Unit::Miles)?;
        let rounded = miles((run_miles.value * 100.0).round() / 100.0);
        self.current = match self.fold {
            Fold::Sum => self.current.try_add(rounded)?,
            Fold::Max => {
                if rounded.try_cmp(self.current)? == Ordering::Greater {
                    rounded
                } else {
                    self.current
                }
            }
        };
        self.last_seen = Some(start);

        if !self.stepped && self.previous.exceeds(Quantity::zero(Unit::Miles))? {
            let bar = match self.margin {
                None => self.previous,
                Some(margin) => self.previous.try_add(margin)?,
            };
            if self.current.exceeds(bar)? {
                self.stepped = true;
                self.candidate = Some((activity.id, start));
            }
        }

        // The chain is the base month plus every qualifying month after
        // it, including the current one the moment it steps. A step is
        // permanent within its month, so latching here is safe.
        let chain = self.consecutive_months + u32::from(self.stepped) + 1;
        if chain >= self.required_months {
            if let Some((id, at)) = self.candidate {
                acquisition.acquire(name, id, at);
            }
        }
        Ok(())
    }
}

/// The evaluator families, one generic implementation each.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluator {
    /// Accumulate per-activity deltas from a policy; acquire when the
    /// count reaches the limit.
    Counter {
        policy: CounterPolicy,
        limit: Quantity,
        baseline: Quantity,
        count: Quantity,
    },
    /// Month-over-month improvement streak.
    MonthlyProgression(MonthlyProgression),
    /// One activity's measured quantity meets a fixed bound.
    SingleEvent { measure: Measure, bound: Quantity },
    /// Latched only by a profile fact; activities are ignored.
    External { fact: Option<ProfileFact> },
    /// Acquires when the gap since the previous run reaches N days.
    ActivityGap {
        min_gap_days: i64,
        last_seen: Option<DateTime<FixedOffset>>,
    },
    /// Two disjoint pace predicates; acquires when both tallies reach
    /// the requirement on the same activity.
    DualPace {
        fast_below: f64,
        slow_above: f64,
        required: u32,
        fast: u32,
        slow: u32,
    },
}

/// One badge: catalog identity, evaluator, latch.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    id: u16,
    name: &'static str,
    evaluator: Evaluator,
    acquisition: Acquisition,
}

impl Badge {
    pub fn new(id: u16, name: &'static str, evaluator: Evaluator) -> Self {
        Self {
            id,
            name,
            evaluator,
            acquisition: Acquisition::default(),
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn acquired(&self) -> bool {
        self.acquisition.acquired()
    }

    pub fn triggering_activity_id(&self) -> Option<i64> {
        self.acquisition.triggering_activity_id
    }

    pub fn earned_at(&self) -> Option<DateTime<FixedOffset>> {
        self.acquisition.earned_at
    }

    /// The stored profile fact of an externally-latched badge.
    ///
    /// Asking before any fact arrived (or asking an activity-driven
    /// badge at all) is a usage error.
    pub fn fact(&self) -> Result<&ProfileFact, EngineError> {
        match &self.evaluator {
            Evaluator::External { fact: Some(fact) } => Ok(fact),
            _ => Err(EngineError::MissingUserInfo { badge: self.name }),
        }
    }

    /// Feed one activity through the badge's evaluator.
    ///
    /// No-op once acquired. A data error is reported to the caller and
    /// never latches the badge.
    pub fn add_activity(&mut self, activity: &Activity) -> Result<(), EngineError> {
        if self.acquired() {
            return Ok(());
        }
        let name = self.name;
        let acquisition = &mut self.acquisition;
        match &mut self.evaluator {
            Evaluator::Counter { policy, limit, baseline, count } => {
                // Two steps: the policy may demand a reset before the
                // delta is applied.
                let delta = policy.increment(activity)?;
                if delta.reset_first {
                    *count = *baseline;
                }
                *count = count.try_add(delta.amount)?;
                debug!(badge = name, activity = activity.id, count = %count, "accumulated");
                if count.at_least(*limit)? {
                    acquisition.acquire(name, activity.id, activity.start_time);
                }
                Ok(())
            }
            Evaluator::MonthlyProgression(machine) => {
                machine.add_activity(name, activity, acquisition)
            }
            Evaluator::SingleEvent { measure, bound } => {
                if measure.of(activity)?.at_least(*bound)? {
                    acquisition.acquire(name, activity.id, activity.start_time);
                }
                Ok(())
            }
            Evaluator::External { .. } => Ok(()),
            Evaluator::ActivityGap { min_gap_days, last_seen } => {
                if let Some(prev) = *last_seen {
                    let gap = activity.start_time.signed_duration_since(prev);
                    if gap.num_days() >= *min_gap_days {
                        acquisition.acquire(name, activity.id, activity.start_time);
                    }
                }
                *last_seen = Some(activity.start_time);
                Ok(())
            }
            Evaluator::DualPace { fast_below, slow_above, required, fast, slow } => {
                let pace = average_pace(activity);
                if pace < *fast_below {
                    *fast += 1;
                }
                if pace > *slow_above {
                    *slow += 1;
                }
                if *fast >= *required && *slow >= *required {
                    acquisition.acquire(name, activity.id, activity.start_time);
                }
                Ok(())
            }
        }
    }

    /// Feed a profile fact. Only externally-latched badges react;
    /// everything else ignores facts. No-op once acquired.
    pub fn add_user_info(&mut self, incoming: &ProfileFact) {
        if self.acquired() {
            return;
        }
        if let Evaluator::External { fact } = &mut self.evaluator {
            self.acquisition.acquire_external(self.name, incoming.earned_at_utc);
            *fact = Some(incoming.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Measure;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use stride_units::{count, kilometers, meters, parse_local};

    fn run(id: i64, start: &str, duration_seconds: f64, distance_km: f64) -> Activity {
        Activity {
            id,
            start_time: parse_local(start).unwrap(),
            duration_seconds,
            distance_km,
            samples: BTreeMap::new(),
        }
    }

    fn total_distance_badge(limit_km: f64) -> Badge {
        Badge::new(
            99,
            "test total",
            Evaluator::Counter {
                policy: CounterPolicy::Total { measure: Measure::Distance },
                limit: kilometers(limit_km),
                baseline: kilometers(0.0),
                count: kilometers(0.0),
            },
        )
    }

    #[test]
    fn test_counter_acquires_at_limit() {
        let mut badge = total_distance_badge(15.0);
        badge.add_activity(&run(1, "2016-06-01T08:00:00+00:00", 3600.0, 10.0)).unwrap();
        assert!(!badge.acquired());
        badge.add_activity(&run(2, "2016-06-02T08:00:00+00:00", 3600.0, 5.0)).unwrap();
        assert!(badge.acquired());
        assert_eq!(badge.triggering_activity_id(), Some(2));
    }

    #[test]
    fn test_latch_once() {
        let mut badge = total_distance_badge(5.0);
        let first = run(1, "2016-06-01T08:00:00+00:00", 3600.0, 10.0);
        let second = run(2, "2016-06-02T08:00:00+00:00", 3600.0, 10.0);
        badge.add_activity(&first).unwrap();
        let earned = badge.earned_at();
        badge.add_activity(&second).unwrap();
        assert_eq!(badge.triggering_activity_id(), Some(1));
        assert_eq!(badge.earned_at(), earned);
    }

    #[test]
    fn test_single_event_elevation() {
        let mut badge = Badge::new(
            241,
            "test elevation",
            Evaluator::SingleEvent { measure: Measure::ElevationRange, bound: meters(56.0) },
        );
        let mut flat = run(1, "2016-06-01T08:00:00+00:00", 3600.0, 10.0);
        flat.samples.insert("elevation".to_string(), vec![10.0, 40.0]);
        badge.add_activity(&flat).unwrap();
        assert!(!badge.acquired());

        let mut hilly = run(2, "2016-06-02T08:00:00+00:00", 3600.0, 10.0);
        hilly.samples.insert("elevation".to_string(), vec![10.0, 80.0]);
        badge.add_activity(&hilly).unwrap();
        assert!(badge.acquired());
        assert_eq!(badge.triggering_activity_id(), Some(2));
    }

    #[test]
    fn test_single_event_error_leaves_state() {
        let mut badge = Badge::new(
            241,
            "test elevation",
            Evaluator::SingleEvent { measure: Measure::ElevationRange, bound: meters(56.0) },
        );
        // No elevation series at all.
        let err = badge.add_activity(&run(1, "2016-06-01T08:00:00+00:00", 3600.0, 10.0));
        assert!(err.is_err());
        assert!(!badge.acquired());
    }

    #[test]
    fn test_external_badge_ignores_activities() {
        let mut badge = Badge::new(31, "test external", Evaluator::External { fact: None });
        badge.add_activity(&run(1, "2016-06-01T08:00:00+00:00", 3600.0, 10.0)).unwrap();
        assert!(!badge.acquired());
        assert!(matches!(badge.fact(), Err(EngineError::MissingUserInfo { .. })));

        let earned = Utc.with_ymd_and_hms(2016, 3, 4, 12, 0, 0).unwrap();
        badge.add_user_info(&ProfileFact {
            badge_id: 31,
            name: "Veteran".to_string(),
            earned_at_utc: earned,
        });
        assert!(badge.acquired());
        assert_eq!(badge.triggering_activity_id(), None);
        assert_eq!(badge.earned_at(), Some(earned.fixed_offset()));
        assert_eq!(badge.fact().unwrap().name, "Veteran");
    }

    #[test]
    fn test_external_latch_keeps_first_fact_timestamp() {
        let mut badge = Badge::new(31, "test external", Evaluator::External { fact: None });
        let first = Utc.with_ymd_and_hms(2016, 3, 4, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2017, 3, 4, 12, 0, 0).unwrap();
        badge.add_user_info(&ProfileFact { badge_id: 31, name: "a".into(), earned_at_utc: first });
        badge.add_user_info(&ProfileFact { badge_id: 31, name: "b".into(), earned_at_utc: later });
        assert_eq!(badge.earned_at(), Some(first.fixed_offset()));
    }

    #[test]
    fn test_activity_gap() {
        let mut badge = Badge::new(
            35,
            "test gap",
            Evaluator::ActivityGap { min_gap_days: 30, last_seen: None },
        );
        badge.add_activity(&run(1, "2016-01-01T08:00:00+00:00", 3600.0, 10.0)).unwrap();
        assert!(!badge.acquired());
        badge.add_activity(&run(2, "2016-01-20T08:00:00+00:00", 3600.0, 10.0)).unwrap();
        assert!(!badge.acquired());
        // 31 days after the last run.
        badge.add_activity(&run(3, "2016-02-20T08:00:00+00:00", 3600.0, 10.0)).unwrap();
        assert!(badge.acquired());
        assert_eq!(badge.triggering_activity_id(), Some(3));
    }

    #[test]
    fn test_dual_pace_needs_both() {
        let mut badge = Badge::new(
            115,
            "test dual",
            Evaluator::DualPace { fast_below: 8.0, slow_above: 10.0, required: 2, fast: 0, slow: 0 },
        );
        // ~7.2 min/mi.
        let fast = |id, day: u32| run(id, &format!("2016-06-{day:02}T08:00:00+00:00"), 2700.0, 10.0);
        // ~11.3 min/mi.
        let slow = |id, day: u32| run(id, &format!("2016-06-{day:02}T09:00:00+00:00"), 4200.0, 10.0);

        badge.add_activity(&fast(1, 1)).unwrap();
        badge.add_activity(&slow(2, 2)).unwrap();
        badge.add_activity(&fast(3, 3)).unwrap();
        assert!(!badge.acquired());
        badge.add_activity(&slow(4, 4)).unwrap();
        assert!(badge.acquired());
        assert_eq!(badge.triggering_activity_id(), Some(4));
    }

    #[test]
    fn test_counter_count_display_in_logs_is_cheap() {
        // Accumulator stays in the limit's unit after conversion.
        let mut badge = Badge::new(
            21,
            "test units",
            Evaluator::Counter {
                policy: CounterPolicy::Total { measure: Measure::Distance },
                limit: stride_units::miles(10.0),
                baseline: stride_units::miles(0.0),
                count: stride_units::miles(0.0),
            },
        );
        badge.add_activity(&run(1, "2016-06-01T08:00:00+00:00", 3600.0, 16.09344)).unwrap();
        assert!(badge.acquired());
    }

    #[test]
    fn test_pace_tally_unit() {
        assert_eq!(count(1.0).try_add(count(1.0)).unwrap(), count(2.0));
    }
}
