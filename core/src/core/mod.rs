//! Inventory orchestration: products, scan bookkeeping, and derived
//! freshness queries over the product store.
//!
//! Every time-dependent operation takes `now`/`today` as an explicit
//! parameter; the library never reads the clock itself.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::core::store::Store;
use crate::freshness::{self, ExpiryAssessment, FreshnessStatus};
use crate::resolve;
use crate::types::{Config, FreshnessThresholds, ProductIdentifier, ProductRecord, ScanStats};
use error::InventoryError;

pub(crate) mod store;

pub mod error {
    use super::*;
    use thiserror::Error;

    pub use crate::core::store::error::StoreError;

    #[derive(Debug, Error)]
    pub enum InventoryError {
        #[error("store error: {0}")]
        Store(#[from] StoreError),
    }
}

pub struct Inventory {
    db: Store,
    thresholds: FreshnessThresholds,
}

/// Result of feeding one scanned payload through the pipeline.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Canonical identifier the payload resolved to. May be empty when the
    /// payload was blank; nothing is recorded in that case.
    pub identifier: String,
    pub stats: Option<ScanStats>,
    pub product: Option<ProductRecord>,
    pub assessment: Option<ExpiryAssessment>,
}

impl ScanOutcome {
    /// True when this identifier has been scanned before.
    pub fn is_duplicate(&self) -> bool {
        self.stats.as_ref().is_some_and(|s| s.count > 1)
    }
}

/// Aggregate counts for the dashboard, bucketed by the canonical classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub fresh: usize,
    pub use_soon: usize,
    pub critical: usize,
    pub expired: usize,
    /// `round((fresh + use_soon/2) / active * 100)` with
    /// `active = total - expired`; 100 when nothing is active.
    pub freshness_percentage: u8,
}

impl Inventory {
    /// Opens (or creates) the inventory at the config's base path.
    pub fn open(config: Config) -> Result<Self, InventoryError> {
        let db = Store::open(&config)?;
        tracing::debug!(path = %config.base_path.display(), "inventory opened");

        Ok(Self {
            db,
            thresholds: config.thresholds,
        })
    }

    pub fn thresholds(&self) -> &FreshnessThresholds {
        &self.thresholds
    }
}

/// Product operations.
impl Inventory {
    /// Registers a product, replacing any record under the same identifier
    /// (re-scanning a known lot re-registers it).
    pub fn register(&mut self, record: ProductRecord) -> Result<(), InventoryError> {
        self.db.upsert_product(&record)?;
        Ok(())
    }

    pub fn product(
        &self,
        id: &ProductIdentifier,
    ) -> Result<Option<ProductRecord>, InventoryError> {
        Ok(self.db.product(id)?)
    }

    /// Removes a product. Returns `true` if a record existed.
    pub fn remove(&mut self, id: &ProductIdentifier) -> Result<bool, InventoryError> {
        Ok(self.db.remove_product(id)?)
    }

    pub fn products(&self) -> Result<Vec<ProductRecord>, InventoryError> {
        Ok(self.db.products()?)
    }
}

/// Scan pipeline.
impl Inventory {
    /// Feeds one raw scan payload through the pipeline: resolve it to a
    /// canonical identifier, bump the scan counter, look the product up, and
    /// classify it if registered.
    pub fn record_scan(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<ScanOutcome, InventoryError> {
        let identifier = resolve::resolve(raw);

        let Ok(id) = ProductIdentifier::try_from(identifier.as_str()) else {
            // Blank or overlong payloads cannot form a lookup key; nothing to record.
            return Ok(ScanOutcome {
                identifier,
                stats: None,
                product: None,
                assessment: None,
            });
        };

        let stats = self.db.record_scan(&id, now)?;
        let product = self.db.product(&id)?;
        let assessment = product
            .as_ref()
            .map(|p| freshness::classify_with(&self.thresholds, p.expiry, today));

        tracing::debug!(%id, count = stats.count, registered = product.is_some(), "scan recorded");

        Ok(ScanOutcome {
            identifier,
            stats: Some(stats),
            product,
            assessment,
        })
    }

    pub fn scan_stats(&self, id: &ProductIdentifier) -> Result<Option<ScanStats>, InventoryError> {
        Ok(self.db.scan_stats(id)?)
    }
}

/// Derived queries.
impl Inventory {
    /// Classifies one registered product.
    pub fn assess(
        &self,
        id: &ProductIdentifier,
        today: NaiveDate,
    ) -> Result<Option<ExpiryAssessment>, InventoryError> {
        Ok(self
            .db
            .product(id)?
            .map(|p| freshness::classify_with(&self.thresholds, p.expiry, today)))
    }

    /// Products whose derived status matches `status`.
    pub fn by_status(
        &self,
        status: FreshnessStatus,
        today: NaiveDate,
    ) -> Result<Vec<ProductRecord>, InventoryError> {
        let mut records = self.db.products()?;
        records.retain(|p| {
            freshness::classify_with(&self.thresholds, p.expiry, today).status == status
        });
        Ok(records)
    }

    /// Products expiring within the next `days` days (today included,
    /// already-expired excluded).
    pub fn expiring_within(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<ProductRecord>, InventoryError> {
        let mut records = self.db.products()?;
        records.retain(|p| {
            let remaining = (p.expiry - today).num_days();
            (0..=i64::from(days)).contains(&remaining)
        });
        Ok(records)
    }

    /// Case-insensitive substring search over product names and lots.
    pub fn search(&self, query: &str) -> Result<Vec<ProductRecord>, InventoryError> {
        let needle = query.to_lowercase();
        let mut records = self.db.products()?;
        records.retain(|p| {
            p.name.to_lowercase().contains(&needle) || p.lot.to_lowercase().contains(&needle)
        });
        Ok(records)
    }

    /// Products ordered by expiry date.
    pub fn sorted_by_expiry(&self, ascending: bool) -> Result<Vec<ProductRecord>, InventoryError> {
        let mut records = self.db.products()?;
        records.sort_by_key(|p| p.expiry);
        if !ascending {
            records.reverse();
        }
        Ok(records)
    }

    /// Aggregate counts for the dashboard.
    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardStats, InventoryError> {
        let mut stats = DashboardStats::default();

        for record in self.db.products()? {
            stats.total += 1;
            match freshness::classify_with(&self.thresholds, record.expiry, today).status {
                FreshnessStatus::Fresh => stats.fresh += 1,
                FreshnessStatus::UseSoon => stats.use_soon += 1,
                FreshnessStatus::Critical => stats.critical += 1,
                FreshnessStatus::Expired => stats.expired += 1,
            }
        }

        let active = stats.total - stats.expired;
        stats.freshness_percentage = if active == 0 {
            100
        } else {
            let weighted = stats.fresh as f64 + stats.use_soon as f64 * 0.5;
            (weighted / active as f64 * 100.0).round() as u8
        };

        Ok(stats)
    }
}
