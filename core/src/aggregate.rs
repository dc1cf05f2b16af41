//! The aggregator: five independent grouped summaries over raw rides.
//!
//! Every table is built over its full fixed grid (all hour slots in the
//! window, all zones, all zone × hour cells, ...). Empty groups are kept
//! with zero counts and 0.0 for every mean, rate, share and variance.
//!
//! RULE: each table is its own reduction. No table reads another
//! table's rows or accumulators.

use crate::{
    calendar::weekday_name,
    config::SimulationWindow,
    trip::TripRecord,
    types::{Hour, VehicleType, Zone},
};
use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HOURLY_METRICS: &str = "hourly_metrics";
pub const GEOGRAPHIC_METRICS: &str = "geographic_metrics";
pub const PEAK_HOURS: &str = "peak_hours";
pub const VEHICLE_TYPE: &str = "vehicle_type";
pub const SURGE_ANALYSIS: &str = "surge_analysis";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ── Row types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyMetrics {
    pub date: NaiveDate,
    pub hour: Hour,
    pub total_rides: u64,
    pub completed_rides: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub avg_distance: f64,
    pub avg_wait_time: f64,
    pub avg_surge: f64,
    pub completion_rate: f64,
    pub day_of_week: String,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicMetrics {
    pub pickup_zone: Zone,
    pub total_rides: u64,
    pub completed_rides: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub avg_distance: f64,
    pub avg_wait_time: f64,
    pub avg_surge: f64,
    pub completion_rate: f64,
    /// Population variance of the zone's daily completion rate, over
    /// the days on which the zone had at least one ride.
    pub completion_rate_variance: f64,
    pub ride_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHourMetrics {
    pub day_of_week: String,
    pub hour: Hour,
    pub ride_count: u64,
    pub avg_wait_time: f64,
    pub avg_surge: f64,
    pub share_of_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTypeMetrics {
    pub pickup_zone: Zone,
    pub vehicle_type: VehicleType,
    pub total_rides: u64,
    pub completed_rides: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub avg_wait_time: f64,
    pub avg_surge: f64,
    pub completion_rate: f64,
    pub zone_vehicle_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeMetrics {
    pub pickup_zone: Zone,
    pub hour: Hour,
    pub ride_count: u64,
    pub avg_wait_time: f64,
    pub avg_surge: f64,
    pub cancel_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTables {
    pub hourly_metrics: Vec<HourlyMetrics>,
    pub geographic_metrics: Vec<GeographicMetrics>,
    pub peak_hours: Vec<PeakHourMetrics>,
    pub vehicle_type: Vec<VehicleTypeMetrics>,
    pub surge_analysis: Vec<SurgeMetrics>,
}

impl AggregateTables {
    /// (table name, row count) in export order.
    pub fn sizes(&self) -> [(&'static str, usize); 5] {
        [
            (HOURLY_METRICS, self.hourly_metrics.len()),
            (GEOGRAPHIC_METRICS, self.geographic_metrics.len()),
            (PEAK_HOURS, self.peak_hours.len()),
            (VEHICLE_TYPE, self.vehicle_type.len()),
            (SURGE_ANALYSIS, self.surge_analysis.len()),
        ]
    }
}

// ── Accumulator ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct RideAccumulator {
    count: u64,
    completed: u64,
    fare: ColumnSum,
    distance: ColumnSum,
    wait: ColumnSum,
    surge: ColumnSum,
}

impl RideAccumulator {
    fn add(&mut self, ride: &TripRecord) {
        self.count += 1;
        if ride.completed {
            self.completed += 1;
        }
        self.fare.add(ride.fare);
        self.distance.add(ride.distance_km);
        self.wait.add(ride.wait_time_minutes);
        self.surge.add(ride.surge_multiplier);
    }

    fn completion_rate(&self) -> f64 {
        ratio(self.completed as f64, self.count)
    }

    fn cancel_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        1.0 - self.completion_rate()
    }
}

/// Sum of one numeric column. NaN cells from an imported file are
/// skipped, so they count towards neither the sum nor the mean.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnSum {
    sum: f64,
    n: u64,
}

impl ColumnSum {
    fn add(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.n += 1;
        }
    }

    fn mean(&self) -> f64 {
        ratio(self.sum, self.n)
    }
}

/// `numerator / count`, or 0.0 for an empty group.
fn ratio(numerator: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Aggregate over the default 365-day window.
pub fn aggregate(rides: &[TripRecord]) -> AggregateTables {
    aggregate_in(rides, &SimulationWindow::default())
}

/// Aggregate with the hourly grid laid over `window`.
pub fn aggregate_in(rides: &[TripRecord], window: &SimulationWindow) -> AggregateTables {
    let tables = AggregateTables {
        hourly_metrics: hourly_metrics(rides, window),
        geographic_metrics: geographic_metrics(rides),
        peak_hours: peak_hours(rides),
        vehicle_type: vehicle_type_metrics(rides),
        surge_analysis: surge_analysis(rides),
    };
    for (name, rows) in tables.sizes() {
        log::debug!("{name}: {rows} rows");
    }
    log::info!("Aggregated {} rides into 5 tables", rides.len());
    tables
}

// ── Reducers ─────────────────────────────────────────────────────────────────

/// One row per (date, hour) slot in the window, sorted by date then hour.
pub fn hourly_metrics(rides: &[TripRecord], window: &SimulationWindow) -> Vec<HourlyMetrics> {
    let mut grid = vec![RideAccumulator::default(); window.hour_slots()];
    let mut outside = 0usize;
    for ride in rides {
        match window.offset_of(ride.timestamp.date()) {
            Some(day) => grid[day as usize * 24 + ride.timestamp.hour() as usize].add(ride),
            None => outside += 1,
        }
    }
    if outside > 0 {
        log::warn!("{outside} rides fall outside the simulation window and are not in {HOURLY_METRICS}");
    }

    grid.iter()
        .enumerate()
        .map(|(slot, acc)| {
            let date = window.date_at((slot / 24) as u32);
            HourlyMetrics {
                date,
                hour: (slot % 24) as Hour,
                total_rides: acc.count,
                completed_rides: acc.completed,
                avg_fare: acc.fare.mean(),
                total_revenue: acc.fare.sum,
                avg_distance: acc.distance.mean(),
                avg_wait_time: acc.wait.mean(),
                avg_surge: acc.surge.mean(),
                completion_rate: acc.completion_rate(),
                day_of_week: weekday_name(date.weekday()).to_string(),
                month: date.month(),
            }
        })
        .collect()
}

/// One row per zone, busiest first.
pub fn geographic_metrics(rides: &[TripRecord]) -> Vec<GeographicMetrics> {
    let mut zones = [RideAccumulator::default(); 6];
    let mut daily: Vec<BTreeMap<NaiveDate, (u64, u64)>> = vec![BTreeMap::new(); 6];
    for ride in rides {
        let z = ride.pickup_zone.index();
        zones[z].add(ride);
        let day = daily[z].entry(ride.timestamp.date()).or_insert((0, 0));
        day.0 += 1;
        if ride.completed {
            day.1 += 1;
        }
    }

    let total = rides.len() as u64;
    let mut rows: Vec<GeographicMetrics> = Zone::ALL
        .iter()
        .map(|zone| {
            let acc = &zones[zone.index()];
            GeographicMetrics {
                pickup_zone: *zone,
                total_rides: acc.count,
                completed_rides: acc.completed,
                avg_fare: acc.fare.mean(),
                total_revenue: acc.fare.sum,
                avg_distance: acc.distance.mean(),
                avg_wait_time: acc.wait.mean(),
                avg_surge: acc.surge.mean(),
                completion_rate: acc.completion_rate(),
                completion_rate_variance: daily_completion_variance(&daily[zone.index()]),
                ride_share: ratio(acc.count as f64, total),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total_rides.cmp(&a.total_rides));
    rows
}

fn daily_completion_variance(days: &BTreeMap<NaiveDate, (u64, u64)>) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    let rates: Vec<f64> = days
        .values()
        .map(|(count, completed)| *completed as f64 / *count as f64)
        .collect();
    let n = rates.len() as f64;
    let mean = rates.iter().sum::<f64>() / n;
    rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n
}

/// One row per (weekday, hour), Monday first.
pub fn peak_hours(rides: &[TripRecord]) -> Vec<PeakHourMetrics> {
    let mut grid = [RideAccumulator::default(); 7 * 24];
    for ride in rides {
        let day = ride.timestamp.weekday().num_days_from_monday() as usize;
        grid[day * 24 + ride.timestamp.hour() as usize].add(ride);
    }

    let total = rides.len() as u64;
    grid.iter()
        .enumerate()
        .map(|(cell, acc)| PeakHourMetrics {
            day_of_week: weekday_name(WEEK[cell / 24]).to_string(),
            hour: (cell % 24) as Hour,
            ride_count: acc.count,
            avg_wait_time: acc.wait.mean(),
            avg_surge: acc.surge.mean(),
            share_of_week: ratio(acc.count as f64, total),
        })
        .collect()
}

/// One row per (zone, vehicle type): zones alphabetically, then the
/// zone's busiest class first.
pub fn vehicle_type_metrics(rides: &[TripRecord]) -> Vec<VehicleTypeMetrics> {
    let mut grid = [[RideAccumulator::default(); 3]; 6];
    for ride in rides {
        grid[ride.pickup_zone.index()][ride.vehicle_type.index()].add(ride);
    }

    let mut rows = Vec::with_capacity(18);
    for zone in Zone::ALL {
        let cells = &grid[zone.index()];
        let zone_total: u64 = cells.iter().map(|c| c.count).sum();
        for vehicle in VehicleType::ALL {
            let acc = &cells[vehicle.index()];
            rows.push(VehicleTypeMetrics {
                pickup_zone: zone,
                vehicle_type: vehicle,
                total_rides: acc.count,
                completed_rides: acc.completed,
                avg_fare: acc.fare.mean(),
                total_revenue: acc.fare.sum,
                avg_wait_time: acc.wait.mean(),
                avg_surge: acc.surge.mean(),
                completion_rate: acc.completion_rate(),
                zone_vehicle_share: ratio(acc.count as f64, zone_total),
            });
        }
    }
    rows.sort_by(|a, b| {
        a.pickup_zone
            .cmp(&b.pickup_zone)
            .then(b.total_rides.cmp(&a.total_rides))
    });
    rows
}

/// One row per (zone, hour), zones alphabetically.
pub fn surge_analysis(rides: &[TripRecord]) -> Vec<SurgeMetrics> {
    let mut grid = [[RideAccumulator::default(); 24]; 6];
    for ride in rides {
        grid[ride.pickup_zone.index()][ride.timestamp.hour() as usize].add(ride);
    }

    Zone::ALL
        .iter()
        .flat_map(|zone| {
            grid[zone.index()]
                .iter()
                .enumerate()
                .map(move |(hour, acc)| SurgeMetrics {
                    pickup_zone: *zone,
                    hour: hour as Hour,
                    ride_count: acc.count,
                    avg_wait_time: acc.wait.mean(),
                    avg_surge: acc.surge.mean(),
                    cancel_rate: acc.cancel_rate(),
                })
        })
        .collect()
}
