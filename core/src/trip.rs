//! The raw trip record: one row per generated ride.

use crate::types::{VehicleType, Zone};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column order of the raw ride file.
pub const RIDE_COLUMNS: [&str; 10] = [
    "ride_id",
    "timestamp",
    "pickup_zone",
    "dropoff_zone",
    "vehicle_type",
    "distance_km",
    "fare",
    "wait_time_minutes",
    "completed",
    "surge_multiplier",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub ride_id: Uuid,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub pickup_zone: Zone,
    pub dropoff_zone: Zone,
    pub vehicle_type: VehicleType,
    #[serde(deserialize_with = "lenient::number")]
    pub distance_km: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fare: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub wait_time_minutes: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub completed: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub surge_multiplier: f64,
}

impl TripRecord {
    pub fn cancelled(&self) -> bool {
        !self.completed
    }
}

/// Round to cents / hundredths, the precision every numeric column is
/// stored at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `YYYY-MM-DD HH:MM:SS`, the layout BI tools parse without hints.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Readers for raw files written by other tools: blank or unparsable
/// numbers become NaN, and booleans may be spelled `True`/`False`/`1`/`0`.
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.trim().parse().unwrap_or(f64::NAN))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" => Ok(true),
            "false" | "0" | "0.0" => Ok(false),
            other => Err(serde::de::Error::custom(format!("not a boolean: {other:?}"))),
        }
    }
}
