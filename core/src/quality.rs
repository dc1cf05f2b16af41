//! Data quality report over a raw ride set.

use crate::trip::{timestamp_format, TripRecord};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub total_records: usize,
    /// Rides whose id already appeared earlier in the set.
    pub duplicates: usize,
    /// Non-finite values per numeric column.
    pub missing_values: BTreeMap<&'static str, usize>,
    #[serde(serialize_with = "serialize_range")]
    pub date_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub completion_rate: f64,
}

pub fn check(rides: &[TripRecord]) -> QualityReport {
    let mut seen = HashSet::with_capacity(rides.len());
    let duplicates = rides.iter().filter(|r| !seen.insert(r.ride_id)).count();

    let mut missing_values = BTreeMap::new();
    let columns: [(&'static str, fn(&TripRecord) -> f64); 4] = [
        ("distance_km", |r: &TripRecord| r.distance_km),
        ("fare", |r: &TripRecord| r.fare),
        ("wait_time_minutes", |r: &TripRecord| r.wait_time_minutes),
        ("surge_multiplier", |r: &TripRecord| r.surge_multiplier),
    ];
    for (name, value) in columns {
        let count = rides.iter().filter(|r| !value(r).is_finite()).count();
        missing_values.insert(name, count);
    }

    let date_range = rides.iter().map(|r| r.timestamp).fold(None, |range, ts| match range {
        None => Some((ts, ts)),
        Some((lo, hi)) => Some((ts.min(lo), ts.max(hi))),
    });

    let completed = rides.iter().filter(|r| r.completed).count();
    let completion_rate = if rides.is_empty() {
        0.0
    } else {
        completed as f64 / rides.len() as f64
    };

    let report = QualityReport {
        total_records: rides.len(),
        duplicates,
        missing_values,
        date_range,
        completion_rate,
    };

    log::info!("Quality check: {} records", report.total_records);
    if report.duplicates > 0 {
        log::warn!("Found {} duplicate ride_ids", report.duplicates);
    }
    report
}

fn serialize_range<S: Serializer>(
    range: &Option<(NaiveDateTime, NaiveDateTime)>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = range.map(|(lo, hi)| {
        [
            lo.format(timestamp_format::FORMAT).to_string(),
            hi.format(timestamp_format::FORMAT).to_string(),
        ]
    });
    formatted.serialize(serializer)
}
