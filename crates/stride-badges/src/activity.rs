//! Input records the engine consumes.
//!
//! Activities and profile facts arrive already parsed and already sorted;
//! the engine reads them and never mutates them. Sample series are
//! optional parallel recordings (elevation, distance, clock) that are
//! index-aligned within one activity.

use crate::error::EngineError;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stride_units::{kilometers, seconds, Quantity};

/// One recorded run, as delivered by the activity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Provider-issued activity id.
    pub id: i64,
    /// Local start time with the recording device's UTC offset.
    pub start_time: DateTime<FixedOffset>,
    /// Elapsed time in seconds (non-negative).
    pub duration_seconds: f64,
    /// Distance covered in kilometers (non-negative).
    pub distance_km: f64,
    /// Optional parallel sample series keyed by name. All series present
    /// on one activity have equal length and are index-aligned.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub samples: BTreeMap<String, Vec<f64>>,
}

impl Activity {
    /// Instant the run ended.
    pub fn end_time(&self) -> DateTime<FixedOffset> {
        self.start_time + Duration::milliseconds((self.duration_seconds * 1000.0) as i64)
    }

    /// Distance as a tagged quantity.
    pub fn distance(&self) -> Quantity {
        kilometers(self.distance_km)
    }

    /// Duration as a tagged quantity.
    pub fn duration(&self) -> Quantity {
        seconds(self.duration_seconds)
    }

    /// Look up a sample series by name.
    ///
    /// An absent key is a precondition violation for whatever computation
    /// needed the series, reported as [`EngineError::UnknownSeries`].
    pub fn series(&self, key: &str) -> Result<&[f64], EngineError> {
        self.samples
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::UnknownSeries {
                activity_id: self.id,
                key: key.to_string(),
            })
    }

    /// Look up two series that must be index-aligned.
    pub fn paired_series(&self, left: &str, right: &str) -> Result<(&[f64], &[f64]), EngineError> {
        let a = self.series(left)?;
        let b = self.series(right)?;
        if a.len() != b.len() {
            return Err(EngineError::MismatchedSeries {
                activity_id: self.id,
                left: left.to_string(),
                right: right.to_string(),
                left_len: a.len(),
                right_len: b.len(),
            });
        }
        Ok((a, b))
    }
}

/// A profile fact: an achievement earned outside activity data
/// (social and meta badges), reported by the provider with its own
/// earned timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFact {
    /// Catalog id of the badge this fact latches.
    pub badge_id: u16,
    /// Badge name as reported by the provider.
    pub name: String,
    /// When the badge was earned, in UTC.
    pub earned_at_utc: DateTime<Utc>,
}
