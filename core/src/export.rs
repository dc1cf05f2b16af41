//! CSV import/export for raw rides and the aggregate tables.
//!
//! RULE: only this module touches CSV files. Column names and order
//! come from the row structs' field order.

use crate::{
    aggregate::{self, AggregateTables},
    error::{SimError, SimResult},
    trip::{TripRecord, RIDE_COLUMNS},
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> SimResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_rides_csv(path: &Path, rides: &[TripRecord]) -> SimResult<()> {
    write_csv(path, rides)?;
    log::info!("Wrote {} rides to {}", rides.len(), path.display());
    Ok(())
}

/// Load a raw ride file, rejecting it if any required column is absent.
pub fn read_rides_csv(path: &Path) -> SimResult<Vec<TripRecord>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = RIDE_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SimError::MissingColumns { columns: missing });
    }

    let rides = reader
        .deserialize::<TripRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Loaded {} rides from {}", rides.len(), path.display());
    Ok(rides)
}

/// Write the five tables into `dir`. Returns table name → file path.
pub fn write_tables(dir: &Path, tables: &AggregateTables) -> SimResult<BTreeMap<String, PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let path_for = |name: &str| dir.join(format!("{name}.csv"));
    let mut outputs = BTreeMap::new();

    let path = path_for(aggregate::HOURLY_METRICS);
    write_csv(&path, &tables.hourly_metrics)?;
    outputs.insert(aggregate::HOURLY_METRICS.to_string(), path);

    let path = path_for(aggregate::GEOGRAPHIC_METRICS);
    write_csv(&path, &tables.geographic_metrics)?;
    outputs.insert(aggregate::GEOGRAPHIC_METRICS.to_string(), path);

    let path = path_for(aggregate::PEAK_HOURS);
    write_csv(&path, &tables.peak_hours)?;
    outputs.insert(aggregate::PEAK_HOURS.to_string(), path);

    let path = path_for(aggregate::VEHICLE_TYPE);
    write_csv(&path, &tables.vehicle_type)?;
    outputs.insert(aggregate::VEHICLE_TYPE.to_string(), path);

    let path = path_for(aggregate::SURGE_ANALYSIS);
    write_csv(&path, &tables.surge_analysis)?;
    outputs.insert(aggregate::SURGE_ANALYSIS.to_string(), path);

    log::info!("Saved {} output files to {}", outputs.len(), dir.display());
    Ok(outputs)
}
