use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifier::ProductIdentifier;

/// A registered product lot.
///
/// Freshness status is never stored on the record: "today" moves daily, so
/// status is derived at query time from `expiry`.
#[cfg_attr(test, derive(Eq, PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductIdentifier,
    pub name: String,
    pub lot: String,
    pub quantity: u32,
    pub unit: Unit,
    pub expiry: NaiveDate,
}

/// Measurement unit printed next to quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Ml,
    Mg,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Ml => write!(f, "ml"),
            Unit::Mg => write!(f, "mg"),
        }
    }
}

/// Per-identifier scan bookkeeping. `first_scanned` is set once and survives
/// later scans of the same code.
#[cfg_attr(test, derive(Eq, PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStats {
    pub count: u32,
    pub first_scanned: DateTime<Utc>,
    pub last_scanned: DateTime<Utc>,
}
