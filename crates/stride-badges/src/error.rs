//! Error types for the badge engine.

use stride_units::UnitError;
use thiserror::Error;

/// Failures raised while evaluating a badge against an activity.
///
/// Data errors (`UnknownSeries`, `MismatchedSeries`) mean the activity
/// cannot support the computation a badge asked for; they are reported
/// per badge and do not stop evaluation of the others. `MissingUserInfo`
/// is a usage error: the caller queried an externally-latched badge
/// before supplying its profile fact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("activity {activity_id} has no sample series {key:?}")]
    UnknownSeries { activity_id: i64, key: String },

    #[error(
        "activity {activity_id}: series {left:?} ({left_len} samples) and {right:?} ({right_len} samples) are not index-aligned"
    )]
    MismatchedSeries {
        activity_id: i64,
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    #[error("badge {badge:?} has no user info yet; call add_user_info first")]
    MissingUserInfo { badge: &'static str },

    #[error("unit error: {0}")]
    Unit(#[from] UnitError),
}
