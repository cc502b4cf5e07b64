//! End-to-end pipeline over the public API: resolve a scanned payload,
//! register the product, scan it again, and read the dashboard.

use chrono::{NaiveDate, TimeZone, Utc};
use galley_core::core::Inventory;
use galley_core::freshness::FreshnessStatus;
use galley_core::resolve::resolve;
use galley_core::types::{Config, ProductIdentifier, ProductRecord, Unit};

const STORAGE_URL: &str =
    "https://firebasestorage.googleapis.com/v0/b/ingbot-f8861.appspot.com/o/abc123def456.png?alt=media";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()
}

#[test]
fn scan_register_rescan() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut inventory = Inventory::open(Config::new(temp.path())).unwrap();

    // First scan: the storage URL resolves, nothing is registered yet.
    let outcome = inventory.record_scan(STORAGE_URL, now(), today()).unwrap();
    assert_eq!(outcome.identifier, "abc123def456");
    assert!(outcome.product.is_none());
    assert!(!outcome.is_duplicate());

    // Register the product under the canonical identifier.
    let id = ProductIdentifier::try_from(outcome.identifier.as_str()).unwrap();
    inventory
        .register(ProductRecord {
            id: id.clone(),
            name: "Chicken Breast".to_string(),
            lot: "LOT-A-2024-10".to_string(),
            quantity: 12,
            unit: Unit::Mg,
            expiry: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
        })
        .unwrap();

    // A differently-encoded payload for the same product lands on the same
    // record and counter.
    let raw = format!(r#"{{"id":"{id}"}}"#);
    let outcome = inventory.record_scan(&raw, now(), today()).unwrap();
    assert!(outcome.is_duplicate());
    assert_eq!(outcome.stats.as_ref().unwrap().count, 2);
    let assessment = outcome.assessment.unwrap();
    assert_eq!(assessment.status, FreshnessStatus::Critical);
    assert_eq!(assessment.message, "2 days remaining");

    let stats = inventory.dashboard(today()).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.critical, 1);
}

#[test]
fn resolution_is_idempotent_across_the_public_surface() {
    let canonical = resolve(STORAGE_URL);
    assert_eq!(resolve(&canonical), canonical);
}
