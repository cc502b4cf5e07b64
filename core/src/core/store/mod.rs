//! Persistence layer for product records and scan bookkeeping.
//!
//! Two redb tables keyed by the canonical identifier:
//! - `products`: ProductIdentifier → VersionedRecord
//! - `scans`: ProductIdentifier → VersionedScan

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, TableDefinition};

use crate::types::{Config, ProductIdentifier, ProductRecord, ScanStats};
use error::StoreError;
use record::{VersionedRecord, VersionedScan};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("table error: {0}")]
        Table(#[from] redb::TableError),

        #[error("storage error: {0}")]
        Storage(#[from] redb::StorageError),

        #[error("transaction error: {0}")]
        Transaction(#[from] redb::TransactionError),

        #[error("commit error: {0}")]
        Commit(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }
}

mod record;

/// Products table: ProductIdentifier → VersionedRecord
const PRODUCTS: TableDefinition<ProductIdentifier, VersionedRecord> =
    TableDefinition::new("products");

/// Scans table: ProductIdentifier → VersionedScan
const SCANS: TableDefinition<ProductIdentifier, VersionedScan> = TableDefinition::new("scans");

/// The product store wrapping redb.
pub struct Store {
    db: redb::Database,
}

impl Store {
    /// Creates or opens the database at the config's base path.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS)?;
            let _ = write_txn.open_table(SCANS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

/// Product operations.
impl Store {
    /// Inserts or replaces a product under its identifier.
    pub fn upsert_product(&mut self, record: &ProductRecord) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PRODUCTS)?;
            table.insert(&record.id, &VersionedRecord::V1(record.clone()))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Retrieves a product by identifier.
    pub fn product(&self, id: &ProductIdentifier) -> Result<Option<ProductRecord>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;

        match table.get(id)? {
            None => Ok(None),
            Some(guard) => Ok(Some(guard.value().into_latest())),
        }
    }

    /// Removes a product. Returns `true` if a record existed.
    pub fn remove_product(&mut self, id: &ProductIdentifier) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = write_txn.open_table(PRODUCTS)?;
            existed = table.remove(id)?.is_some();
        }
        write_txn.commit()?;
        Ok(existed)
    }

    /// Returns all products, ordered by identifier.
    pub fn products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value_guard) = entry?;
            records.push(value_guard.value().into_latest());
        }

        Ok(records)
    }
}

/// Scan bookkeeping.
impl Store {
    /// Inserts or increments the scan counter for an identifier, preserving
    /// `first_scanned` across repeat scans.
    pub fn record_scan(
        &mut self,
        id: &ProductIdentifier,
        now: DateTime<Utc>,
    ) -> Result<ScanStats, StoreError> {
        let write_txn = self.db.begin_write()?;
        let stats;
        {
            let mut table = write_txn.open_table(SCANS)?;

            stats = match table.get(id)?.map(|guard| guard.value().into_latest()) {
                Some(previous) => ScanStats {
                    count: previous.count + 1,
                    first_scanned: previous.first_scanned,
                    last_scanned: now,
                },
                None => ScanStats {
                    count: 1,
                    first_scanned: now,
                    last_scanned: now,
                },
            };

            table.insert(id, &VersionedScan::V1(stats.clone()))?;
        }
        write_txn.commit()?;
        Ok(stats)
    }

    /// Retrieves scan bookkeeping for an identifier.
    pub fn scan_stats(&self, id: &ProductIdentifier) -> Result<Option<ScanStats>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SCANS)?;

        match table.get(id)? {
            None => Ok(None),
            Some(guard) => Ok(Some(guard.value().into_latest())),
        }
    }
}
