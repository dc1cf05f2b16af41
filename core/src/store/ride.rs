use super::RideStore;
use crate::{error::SimResult, trip::TripRecord};
use rusqlite::params;

impl RideStore {
    // ── Raw rides ──────────────────────────────────────────────

    pub fn insert_rides(&self, run_id: &str, rides: &[TripRecord]) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO ride (
                    run_id, ride_id, timestamp, pickup_zone, dropoff_zone,
                    vehicle_type, distance_km, fare, wait_time_minutes,
                    completed, surge_multiplier
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            )?;
            for ride in rides {
                stmt.execute(params![
                    run_id,
                    ride.ride_id.to_string(),
                    ride.timestamp.format(crate::trip::timestamp_format::FORMAT).to_string(),
                    ride.pickup_zone.name(),
                    ride.dropoff_zone.name(),
                    ride.vehicle_type.name(),
                    ride.distance_km,
                    ride.fare,
                    ride.wait_time_minutes,
                    ride.completed,
                    ride.surge_multiplier,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("Stored {} rides for run {run_id}", rides.len());
        Ok(())
    }

    pub fn ride_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM ride WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn completed_ride_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM ride WHERE run_id = ?1 AND completed = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
