//! RideGen core: synthesizes coupled ride-hailing trip records and
//! reduces them into BI-ready summary tables.
//!
//! Pipeline: `generate(n, seed)` → raw rides → `aggregate(&rides)`
//! → five tables, exportable as CSV or into SQLite.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod pressure;
pub mod pricing;
pub mod quality;
pub mod rng;
pub mod store;
pub mod trip;
pub mod types;
pub mod vehicle;

pub use aggregate::{aggregate, aggregate_in, AggregateTables};
pub use config::GeneratorConfig;
pub use error::{SimError, SimResult};
pub use generator::{generate, RideGenerator, DEFAULT_SEED};
pub use trip::TripRecord;
