//! CSV export and import.

use ridegen_core::{aggregate, export, generate, quality, SimError};
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ridegen-{}-{name}", std::process::id()))
}

#[test]
fn raw_rides_survive_a_csv_round_trip() {
    let path = scratch("rides.csv");
    let rides = generate(1_000, 42).unwrap();

    export::write_rides_csv(&path, &rides).unwrap();
    let loaded = export::read_rides_csv(&path).unwrap();
    assert_eq!(loaded, rides);

    let header = std::fs::read_to_string(&path).unwrap();
    let first_line = header.lines().next().unwrap();
    assert_eq!(
        first_line,
        "ride_id,timestamp,pickup_zone,dropoff_zone,vehicle_type,distance_km,fare,wait_time_minutes,completed,surge_multiplier"
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_columns_are_reported() {
    let path = scratch("broken.csv");
    std::fs::write(
        &path,
        "ride_id,timestamp,pickup_zone\n00000000-0000-0000-0000-000000000000,2023-01-01 08:00:00,Vake\n",
    )
    .unwrap();

    match export::read_rides_csv(&path) {
        Err(SimError::MissingColumns { columns }) => {
            assert!(columns.contains(&"fare".to_string()));
            assert!(columns.contains(&"surge_multiplier".to_string()));
            assert!(!columns.contains(&"ride_id".to_string()));
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }

    std::fs::remove_file(&path).ok();
}

const HEADER: &str = "ride_id,timestamp,pickup_zone,dropoff_zone,vehicle_type,distance_km,fare,wait_time_minutes,completed,surge_multiplier";

#[test]
fn capitalised_booleans_are_accepted() {
    let path = scratch("capitalised.csv");
    std::fs::write(
        &path,
        format!(
            "{HEADER}\n\
             00000000-0000-0000-0000-000000000001,2023-01-01 08:00:00,Vake,Vake,Economy,3.1,8.4,4.2,True,1.3\n\
             00000000-0000-0000-0000-000000000002,2023-01-01 09:00:00,Gldani,Vake,XL,5.0,14.0,9.0,False,1.8\n\
             00000000-0000-0000-0000-000000000003,2023-01-01 10:00:00,Gldani,Gldani,Comfort,2.0,6.0,3.0,1,1.1\n"
        ),
    )
    .unwrap();

    let rides = export::read_rides_csv(&path).unwrap();
    let completed: Vec<bool> = rides.iter().map(|r| r.completed).collect();
    assert_eq!(completed, [true, false, true]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn blank_and_garbled_numbers_load_as_missing_values() {
    let path = scratch("blanks.csv");
    std::fs::write(
        &path,
        format!(
            "{HEADER}\n\
             00000000-0000-0000-0000-000000000001,2023-01-01 08:00:00,Vake,Vake,Economy,3.1,,4.2,True,1.3\n\
             00000000-0000-0000-0000-000000000002,2023-01-01 09:00:00,Vake,Vake,Economy,n/a,11.0,5.0,False,1.4\n"
        ),
    )
    .unwrap();

    let rides = export::read_rides_csv(&path).unwrap();
    assert_eq!(rides.len(), 2);
    assert!(rides[0].fare.is_nan());
    assert!(rides[1].distance_km.is_nan());

    let report = quality::check(&rides);
    assert_eq!(report.missing_values["fare"], 1);
    assert_eq!(report.missing_values["distance_km"], 1);
    assert_eq!(report.missing_values["wait_time_minutes"], 0);

    let geo = aggregate(&rides)
        .geographic_metrics
        .into_iter()
        .find(|r| r.pickup_zone == ridegen_core::types::Zone::Vake)
        .unwrap();
    assert_eq!(geo.total_rides, 2);
    assert_eq!(geo.avg_fare, 11.0);

    std::fs::remove_file(&path).ok();
}

#[test]
fn unreadable_completed_flag_is_an_error() {
    let path = scratch("bad-flag.csv");
    std::fs::write(
        &path,
        format!(
            "{HEADER}\n\
             00000000-0000-0000-0000-000000000001,2023-01-01 08:00:00,Vake,Vake,Economy,3.1,8.4,4.2,maybe,1.3\n"
        ),
    )
    .unwrap();

    assert!(matches!(export::read_rides_csv(&path), Err(SimError::Csv(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn all_five_tables_are_written_with_headers() {
    let dir = scratch("processed");
    let tables = aggregate(&generate(2_000, 42).unwrap());
    let outputs = export::write_tables(&dir, &tables).unwrap();

    let expected = [
        ("hourly_metrics", "date,hour,total_rides,completed_rides,avg_fare,total_revenue,avg_distance,avg_wait_time,avg_surge,completion_rate,day_of_week,month", 8_760),
        ("geographic_metrics", "pickup_zone,total_rides,completed_rides,avg_fare,total_revenue,avg_distance,avg_wait_time,avg_surge,completion_rate,completion_rate_variance,ride_share", 6),
        ("peak_hours", "day_of_week,hour,ride_count,avg_wait_time,avg_surge,share_of_week", 168),
        ("vehicle_type", "pickup_zone,vehicle_type,total_rides,completed_rides,avg_fare,total_revenue,avg_wait_time,avg_surge,completion_rate,zone_vehicle_share", 18),
        ("surge_analysis", "pickup_zone,hour,ride_count,avg_wait_time,avg_surge,cancel_rate", 144),
    ];
    assert_eq!(outputs.len(), expected.len());

    for (name, header, rows) in expected {
        let path = &outputs[name];
        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(header), "{name} header");
        assert_eq!(lines.count(), rows, "{name} row count");
    }

    std::fs::remove_dir_all(&dir).ok();
}
