pub mod core;
pub mod freshness;
pub mod resolve;
pub mod types;
pub mod verify;

pub use crate::core::{DashboardStats, Inventory, ScanOutcome};
pub use freshness::{ExpiryAssessment, FreshnessStatus, classify, classify_raw};
pub use resolve::resolve;
