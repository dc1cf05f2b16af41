//! SQLite export.

use ridegen_core::{
    aggregate, generate,
    store::{MetricsTable, RideStore},
};

fn store() -> RideStore {
    let store = RideStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn rides_and_tables_are_persisted_per_run() {
    let store = store();
    let rides = generate(1_500, 42).unwrap();
    let tables = aggregate(&rides);

    store.insert_run("run-a", 42, rides.len(), "0.1.0-test").unwrap();
    store.insert_rides("run-a", &rides).unwrap();
    store.insert_tables("run-a", &tables).unwrap();

    assert_eq!(store.run_seed("run-a").unwrap(), 42);
    assert_eq!(store.ride_count("run-a").unwrap(), 1_500);
    let completed = rides.iter().filter(|r| r.completed).count() as i64;
    assert_eq!(store.completed_ride_count("run-a").unwrap(), completed);

    let expected = [
        (MetricsTable::Hourly, 8_760),
        (MetricsTable::Geographic, 6),
        (MetricsTable::PeakHours, 168),
        (MetricsTable::VehicleType, 18),
        (MetricsTable::Surge, 144),
    ];
    for (table, rows) in expected {
        assert_eq!(
            store.table_row_count("run-a", table).unwrap(),
            rows,
            "{} row count",
            table.table_name()
        );
    }

    let totals = store.zone_ride_totals("run-a").unwrap();
    assert_eq!(totals.len(), 6);
    assert_eq!(totals.iter().map(|(_, n)| n).sum::<i64>(), 1_500);
    assert!(totals.iter().any(|(zone, _)| zone == "Old Town"));
}

#[test]
fn runs_do_not_mix() {
    let store = store();
    let rides = generate(200, 1).unwrap();
    store.insert_run("run-a", 1, rides.len(), "test").unwrap();
    store.insert_run("run-b", 2, 0, "test").unwrap();
    store.insert_rides("run-a", &rides).unwrap();

    assert_eq!(store.ride_count("run-a").unwrap(), 200);
    assert_eq!(store.ride_count("run-b").unwrap(), 0);
    for table in MetricsTable::ALL {
        assert_eq!(store.table_row_count("run-b", table).unwrap(), 0);
    }
}

#[test]
fn rides_for_unknown_run_are_rejected() {
    let store = store();
    let rides = generate(5, 1).unwrap();
    assert!(store.insert_rides("no-such-run", &rides).is_err());
}
