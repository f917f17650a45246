//! The badge set: the full catalog instantiated for one evaluation run.
//!
//! The set applies the global start-date cutoff, fans each activity out
//! to every active badge, routes profile facts by badge id, and exposes
//! the read-only result surface.

use crate::activity::{Activity, ProfileFact};
use crate::badge::Badge;
use crate::catalog::CATALOG;
use crate::error::EngineError;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One badge's evaluation failure for one activity. Collected rather
/// than aborting the rest of the set.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeFailure {
    pub badge_id: u16,
    pub name: &'static str,
    pub error: EngineError,
}

/// All active badges for one user's replay.
///
/// Activities must be supplied in non-decreasing start-time order; the
/// period and streak policies are defined in terms of processing order,
/// so the set diagnoses a regression but never re-sorts.
#[derive(Debug, Clone)]
pub struct BadgeSet {
    cutoff: Option<DateTime<FixedOffset>>,
    last_start: Option<DateTime<FixedOffset>>,
    badges: BTreeMap<u16, Badge>,
}

impl BadgeSet {
    /// Instantiate the catalog. Activities starting before `cutoff` are
    /// discarded. A non-empty `only_ids` restricts evaluation to those
    /// catalog ids; everything else is excluded entirely.
    pub fn new(cutoff: Option<DateTime<FixedOffset>>, only_ids: &[u16]) -> Self {
        let badges = CATALOG
            .iter()
            .filter(|row| only_ids.is_empty() || only_ids.contains(&row.id))
            .map(|row| (row.id, row.instantiate()))
            .collect();
        Self {
            cutoff,
            last_start: None,
            badges,
        }
    }

    /// Fan one activity out to every badge.
    ///
    /// Returns the badges that could not evaluate this activity; an
    /// empty vec means everyone took it cleanly.
    pub fn add_activity(&mut self, activity: &Activity) -> Vec<BadgeFailure> {
        if let Some(cutoff) = self.cutoff {
            if activity.start_time < cutoff {
                debug!(activity = activity.id, %cutoff, "skipping activity before cutoff");
                return Vec::new();
            }
        }

        if let Some(last) = self.last_start {
            if activity.start_time < last {
                warn!(
                    activity = activity.id,
                    start = %activity.start_time,
                    previous = %last,
                    "activity out of order; period and streak logic may misfire"
                );
            }
        }
        self.last_start = Some(activity.start_time);

        debug!(activity = activity.id, "adding activity");
        let mut failures = Vec::new();
        for badge in self.badges.values_mut() {
            if let Err(error) = badge.add_activity(activity) {
                failures.push(BadgeFailure {
                    badge_id: badge.id(),
                    name: badge.name(),
                    error,
                });
            }
        }
        failures
    }

    /// Route a profile fact to its badge. A fact for a badge that is
    /// not in the active catalog is dropped with a diagnostic.
    pub fn add_user_info(&mut self, fact: &ProfileFact) {
        debug!(badge_id = fact.badge_id, name = %fact.name, "adding user info");
        match self.badges.get_mut(&fact.badge_id) {
            Some(badge) => badge.add_user_info(fact),
            None => warn!(badge_id = fact.badge_id, "dropping user info for unknown badge"),
        }
    }

    /// All active badges, in id order.
    pub fn badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.values()
    }

    pub fn get(&self, id: u16) -> Option<&Badge> {
        self.badges.get(&id)
    }

    /// Badges that have latched.
    pub fn acquired(&self) -> impl Iterator<Item = &Badge> {
        self.badges().filter(|b| b.acquired())
    }

    /// Badges still open.
    pub fn unacquired(&self) -> impl Iterator<Item = &Badge> {
        self.badges().filter(|b| !b.acquired())
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use std::collections::BTreeMap;
    use stride_units::parse_local;

    fn run(id: i64, start: &str, duration_seconds: f64, distance_km: f64) -> Activity {
        Activity {
            id,
            start_time: parse_local(start).unwrap(),
            duration_seconds,
            distance_km,
            samples: BTreeMap::new(),
        }
    }

    #[test]
    fn test_full_catalog_by_default() {
        let set = BadgeSet::new(None, &[]);
        assert_eq!(set.len(), CATALOG.len());
    }

    #[test]
    fn test_only_ids_restricts() {
        let set = BadgeSet::new(None, &[7, 35]);
        assert_eq!(set.len(), 2);
        assert!(set.get(7).is_some());
        assert!(set.get(6).is_none());
    }

    #[test]
    fn test_elevation_failures_are_collected_not_fatal() {
        let mut set = BadgeSet::new(None, &[7, 241]);
        // No elevation series: badge 241 fails, badge 7 still evaluates.
        let marathon = run(1, "2016-06-01T08:00:00+00:00", 14400.0, 42.2);
        let failures = set.add_activity(&marathon);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].badge_id, 241);
        assert!(set.get(7).unwrap().acquired());
    }
}
