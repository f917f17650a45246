//! Per-activity derived values.
//!
//! Pure functions over one activity: elevation range across the
//! elevation series, average pace, and intra-activity pace variability
//! from the paired distance/clock series.

use crate::activity::Activity;
use crate::error::EngineError;
use stride_units::{meters, Quantity, Unit};

/// Max minus min of the activity's elevation samples, in meters.
/// An empty series spans no elevation at all.
pub fn elevation_range(activity: &Activity) -> Result<Quantity, EngineError> {
    let elevations = activity.series("elevation")?;
    if elevations.is_empty() {
        return Ok(meters(0.0));
    }
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    for &e in elevations {
        lowest = lowest.min(e);
        highest = highest.max(e);
    }
    Ok(meters(highest - lowest))
}

/// Average pace in minutes per mile. A zero-distance activity is
/// infinitely slow, which keeps threshold comparisons well-defined.
pub fn average_pace(activity: &Activity) -> f64 {
    let miles = activity.distance_km * Unit::Kilometers.factor() / Unit::Miles.factor();
    if miles <= 0.0 {
        return f64::INFINITY;
    }
    (activity.duration_seconds / 60.0) / miles
}

/// Population standard deviation of per-segment pace (minutes per
/// kilometer), computed from the paired `distance`/`clock` sample
/// series.
///
/// Fewer than two samples leave variability undefined: `Ok(None)`.
/// Segments whose clock or distance does not advance are sensor
/// duplicates and are skipped.
pub fn pace_variability(activity: &Activity) -> Result<Option<f64>, EngineError> {
    let (distance, clock) = activity.paired_series("distance", "clock")?;

    let mut paces = Vec::with_capacity(distance.len().saturating_sub(1));
    for i in 1..distance.len() {
        let d = distance[i] - distance[i - 1];
        let t = clock[i] - clock[i - 1];
        if t > 0.0 && d > 0.0 {
            paces.push((t / 60.0) / d);
        }
    }
    if paces.is_empty() {
        return Ok(None);
    }

    let mean = paces.iter().sum::<f64>() / paces.len() as f64;
    let variance = paces.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / paces.len() as f64;
    Ok(Some(variance.sqrt()))
}
