use super::*;
use crate::types::{ProductIdentifier, Unit};
use chrono::{NaiveDate, TimeZone, Utc};

fn sample_record() -> ProductRecord {
    ProductRecord {
        id: ProductIdentifier::try_from("PRD-001").unwrap(),
        name: "Whole Milk 1L".to_string(),
        lot: "LOT-B-2024-10".to_string(),
        quantity: 48,
        unit: Unit::Ml,
        expiry: NaiveDate::from_ymd_opt(2025, 10, 30).unwrap(),
    }
}

#[test]
fn record_round_trips_through_bytes() {
    let record = sample_record();

    let bytes = <VersionedRecord as redb::Value>::as_bytes(&VersionedRecord::V1(record.clone()));
    assert_eq!(bytes[0], ProductRecord::VERSION);

    let decoded = <VersionedRecord as redb::Value>::from_bytes(&bytes);
    assert_eq!(decoded.into_latest(), record);
}

#[test]
fn scan_stats_round_trip_through_bytes() {
    let stats = ScanStats {
        count: 3,
        first_scanned: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
        last_scanned: Utc.with_ymd_and_hms(2025, 1, 12, 17, 30, 0).unwrap(),
    };

    let bytes = <VersionedScan as redb::Value>::as_bytes(&VersionedScan::V1(stats.clone()));
    assert_eq!(bytes[0], ScanStats::VERSION);

    let decoded = <VersionedScan as redb::Value>::from_bytes(&bytes);
    assert_eq!(decoded.into_latest(), stats);
}

#[test]
#[should_panic(expected = "unsupported record version")]
fn unknown_record_version_panics() {
    let _ = <VersionedRecord as redb::Value>::from_bytes(&[99, 0, 0]);
}
