use super::RideStore;
use crate::{
    aggregate::{
        GeographicMetrics, HourlyMetrics, PeakHourMetrics, SurgeMetrics, VehicleTypeMetrics,
        GEOGRAPHIC_METRICS, HOURLY_METRICS, PEAK_HOURS, SURGE_ANALYSIS, VEHICLE_TYPE,
    },
    error::SimResult,
};
use rusqlite::{params, Connection};

/// The aggregate tables the store can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsTable {
    Hourly,
    Geographic,
    PeakHours,
    VehicleType,
    Surge,
}

impl MetricsTable {
    pub const ALL: [MetricsTable; 5] = [
        Self::Hourly,
        Self::Geographic,
        Self::PeakHours,
        Self::VehicleType,
        Self::Surge,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Hourly      => HOURLY_METRICS,
            Self::Geographic  => GEOGRAPHIC_METRICS,
            Self::PeakHours   => PEAK_HOURS,
            Self::VehicleType => VEHICLE_TYPE,
            Self::Surge       => SURGE_ANALYSIS,
        }
    }
}

impl RideStore {
    // ── Aggregates ─────────────────────────────────────────────

    pub fn table_row_count(&self, run_id: &str, table: MetricsTable) -> SimResult<i64> {
        // Table names come from a closed enum, never from input.
        let sql = format!("SELECT COUNT(*) FROM {} WHERE run_id = ?1", table.table_name());
        let count = self.conn.query_row(&sql, params![run_id], |row| row.get(0))?;
        Ok(count)
    }

    /// (zone, total_rides) from the stored geographic table.
    pub fn zone_ride_totals(&self, run_id: &str) -> SimResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT pickup_zone, total_rides FROM geographic_metrics
             WHERE run_id = ?1 ORDER BY pickup_zone ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

pub(super) fn insert_hourly(conn: &Connection, run_id: &str, rows: &[HourlyMetrics]) -> SimResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO hourly_metrics (
            run_id, date, hour, total_rides, completed_rides, avg_fare,
            total_revenue, avg_distance, avg_wait_time, avg_surge,
            completion_rate, day_of_week, month
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
    )?;
    for r in rows {
        stmt.execute(params![
            run_id,
            r.date.to_string(),
            r.hour,
            r.total_rides as i64,
            r.completed_rides as i64,
            r.avg_fare,
            r.total_revenue,
            r.avg_distance,
            r.avg_wait_time,
            r.avg_surge,
            r.completion_rate,
            r.day_of_week,
            r.month,
        ])?;
    }
    Ok(())
}

pub(super) fn insert_geographic(
    conn: &Connection,
    run_id: &str,
    rows: &[GeographicMetrics],
) -> SimResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO geographic_metrics (
            run_id, pickup_zone, total_rides, completed_rides, avg_fare,
            total_revenue, avg_distance, avg_wait_time, avg_surge,
            completion_rate, completion_rate_variance, ride_share
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
    )?;
    for r in rows {
        stmt.execute(params![
            run_id,
            r.pickup_zone.name(),
            r.total_rides as i64,
            r.completed_rides as i64,
            r.avg_fare,
            r.total_revenue,
            r.avg_distance,
            r.avg_wait_time,
            r.avg_surge,
            r.completion_rate,
            r.completion_rate_variance,
            r.ride_share,
        ])?;
    }
    Ok(())
}

pub(super) fn insert_peak_hours(
    conn: &Connection,
    run_id: &str,
    rows: &[PeakHourMetrics],
) -> SimResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO peak_hours (
            run_id, day_of_week, hour, ride_count, avg_wait_time,
            avg_surge, share_of_week
        ) VALUES (?1,?2,?3,?4,?5,?6,?7)",
    )?;
    for r in rows {
        stmt.execute(params![
            run_id,
            r.day_of_week,
            r.hour,
            r.ride_count as i64,
            r.avg_wait_time,
            r.avg_surge,
            r.share_of_week,
        ])?;
    }
    Ok(())
}

pub(super) fn insert_vehicle_type(
    conn: &Connection,
    run_id: &str,
    rows: &[VehicleTypeMetrics],
) -> SimResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO vehicle_type (
            run_id, pickup_zone, vehicle_type, total_rides, completed_rides,
            avg_fare, total_revenue, avg_wait_time, avg_surge,
            completion_rate, zone_vehicle_share
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
    )?;
    for r in rows {
        stmt.execute(params![
            run_id,
            r.pickup_zone.name(),
            r.vehicle_type.name(),
            r.total_rides as i64,
            r.completed_rides as i64,
            r.avg_fare,
            r.total_revenue,
            r.avg_wait_time,
            r.avg_surge,
            r.completion_rate,
            r.zone_vehicle_share,
        ])?;
    }
    Ok(())
}

pub(super) fn insert_surge(conn: &Connection, run_id: &str, rows: &[SurgeMetrics]) -> SimResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO surge_analysis (
            run_id, pickup_zone, hour, ride_count, avg_wait_time,
            avg_surge, cancel_rate
        ) VALUES (?1,?2,?3,?4,?5,?6,?7)",
    )?;
    for r in rows {
        stmt.execute(params![
            run_id,
            r.pickup_zone.name(),
            r.hour,
            r.ride_count as i64,
            r.avg_wait_time,
            r.avg_surge,
            r.cancel_rate,
        ])?;
    }
    Ok(())
}
