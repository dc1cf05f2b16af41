//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The pipeline hands finished rows to store methods; it never
//! executes SQL directly.

use crate::{aggregate::AggregateTables, error::SimResult};
use rusqlite::{params, Connection};
mod metrics;
mod ride;

pub use metrics::MetricsTable;

pub struct RideStore {
    conn: Connection,
}

impl RideStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, n_rides: usize, version: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, n_rides, version) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, n_rides as i64, version],
        )?;
        Ok(())
    }

    pub fn run_seed(&self, run_id: &str) -> SimResult<u64> {
        let seed: i64 = self.conn.query_row(
            "SELECT seed FROM run WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(seed as u64)
    }

    /// Write all five tables for `run_id` in one transaction.
    pub fn insert_tables(&self, run_id: &str, tables: &AggregateTables) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        metrics::insert_hourly(&tx, run_id, &tables.hourly_metrics)?;
        metrics::insert_geographic(&tx, run_id, &tables.geographic_metrics)?;
        metrics::insert_peak_hours(&tx, run_id, &tables.peak_hours)?;
        metrics::insert_vehicle_type(&tx, run_id, &tables.vehicle_type)?;
        metrics::insert_surge(&tx, run_id, &tables.surge_analysis)?;
        tx.commit()?;
        log::info!("Stored aggregate tables for run {run_id}");
        Ok(())
    }
}
