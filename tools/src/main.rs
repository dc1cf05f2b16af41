//! ridegen-runner: headless pipeline runner for RideGen.
//!
//! Usage:
//!   ridegen-runner --n-rides 450000 --seed 42
//!   ridegen-runner --input data/raw_rides.csv --check-quality
//!   ridegen-runner --n-rides 5000 --db rides.db

use anyhow::Result;
use clap::Parser;
use ridegen_core::{
    aggregate_in, export, quality, store::RideStore, GeneratorConfig, RideGenerator,
    DEFAULT_SEED,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Generate and aggregate synthetic ride-hailing data", long_about = None)]
struct RunnerArgs {
    #[arg(long, default_value_t = 450_000, help = "number of rides to generate")]
    n_rides: i64,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "master random seed")]
    seed: u64,
    #[arg(long, help = "JSON generator config; defaults are used when omitted")]
    config: Option<String>,
    #[arg(long, default_value = "data/raw_rides.csv", help = "where to write the raw rides")]
    raw_path: PathBuf,
    #[arg(long, default_value = "data/processed", help = "directory for the aggregate tables")]
    output_dir: PathBuf,
    #[arg(long, help = "aggregate an existing raw ride file instead of generating")]
    input: Option<PathBuf>,
    #[arg(long, help = "also store rides and tables in this SQLite database")]
    db: Option<String>,
    #[arg(long, help = "print a data quality report as JSON")]
    check_quality: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = RunnerArgs::parse();

    let config = match &args.config {
        None => GeneratorConfig::default(),
        Some(path) => {
            log::info!("reading generator configuration from {path}");
            GeneratorConfig::load(path)?
        }
    };
    // Validate before touching any file.
    config.validate()?;

    let rides = match &args.input {
        Some(path) => export::read_rides_csv(path)?,
        None => {
            let generator = RideGenerator::new(config.clone(), args.seed)?;
            let rides = generator.generate(args.n_rides)?;
            export::write_rides_csv(&args.raw_path, &rides)?;
            rides
        }
    };

    if args.check_quality {
        let report = quality::check(&rides);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let tables = aggregate_in(&rides, &config.window);
    let outputs = export::write_tables(&args.output_dir, &tables)?;

    if let Some(db) = &args.db {
        let store = RideStore::open(db)?;
        store.migrate()?;
        let run_id = format!(
            "run-{}-{}",
            args.seed,
            chrono::Utc::now().format("%Y%m%d%H%M%S")
        );
        store.insert_run(&run_id, args.seed, rides.len(), env!("CARGO_PKG_VERSION"))?;
        store.insert_rides(&run_id, &rides)?;
        store.insert_tables(&run_id, &tables)?;
        println!("Stored run {run_id} in {db}");
    }

    println!("Processing complete");
    for (name, path) in &outputs {
        println!("- {name}: {}", path.display());
    }
    Ok(())
}
