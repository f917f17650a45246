//! Shared fixtures for the integration suites.

use std::collections::BTreeMap;
use stride_badges::Activity;
use stride_units::parse_local;

/// A run with no sample series.
pub fn run(id: i64, start: &str, duration_seconds: f64, distance_km: f64) -> Activity {
    Activity {
        id,
        start_time: parse_local(start).unwrap(),
        duration_seconds,
        distance_km,
        samples: BTreeMap::new(),
    }
}

/// Attach a sample series to a run.
#[allow(dead_code)]
pub fn with_series(mut activity: Activity, key: &str, values: Vec<f64>) -> Activity {
    activity.samples.insert(key.to_string(), values);
    activity
}

/// Kilometers equivalent of a distance in miles, so tests can speak the
/// unit badge limits are written in.
#[allow(dead_code)]
pub fn miles_km(miles: f64) -> f64 {
    miles * 1.609344
}
