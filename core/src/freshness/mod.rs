//! Shelf-life classification.
//!
//! Maps an expiry date and an explicit "today" to a coarse urgency bucket and
//! a display-ready message. The reference date is always a parameter, never a
//! hidden clock read, so every call is deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::FreshnessThresholds;

/// Urgency bucket for a product's remaining shelf life.
///
/// Ordered by urgency: `Fresh < UseSoon < Critical < Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FreshnessStatus {
    Fresh,
    UseSoon,
    Critical,
    Expired,
}

impl FreshnessStatus {
    /// Human-readable label for list views and dashboards.
    pub fn label(self) -> &'static str {
        match self {
            FreshnessStatus::Fresh => "Fresh",
            FreshnessStatus::UseSoon => "Use Soon",
            FreshnessStatus::Critical => "Critical",
            FreshnessStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessStatus::Fresh => write!(f, "fresh"),
            FreshnessStatus::UseSoon => write!(f, "useSoon"),
            FreshnessStatus::Critical => write!(f, "critical"),
            FreshnessStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Assessment of one product's remaining shelf life.
///
/// Derived on demand from the expiry date and "today"; never persisted,
/// since it goes stale at midnight.
#[cfg_attr(test, derive(Eq, PartialEq))]
#[derive(Debug, Clone, Serialize)]
pub struct ExpiryAssessment {
    /// Calendar days until expiry: positive = future, zero = expires today,
    /// negative = already expired.
    pub days_remaining: i64,
    pub status: FreshnessStatus,
    pub message: String,
}

impl ExpiryAssessment {
    /// Message carried by the sentinel assessment for unparsable dates.
    pub const UNREADABLE_MESSAGE: &'static str = "unreadable expiry date";

    /// Sentinel for expiry dates that cannot be parsed: classified as already
    /// expired, with a distinguishable message instead of a propagated error.
    fn unreadable() -> Self {
        Self {
            days_remaining: 0,
            status: FreshnessStatus::Expired,
            message: Self::UNREADABLE_MESSAGE.to_string(),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.message == Self::UNREADABLE_MESSAGE
    }
}

/// Classifies with the default day thresholds (critical at 3, use-soon at 7).
pub fn classify(expiry: NaiveDate, today: NaiveDate) -> ExpiryAssessment {
    classify_with(&FreshnessThresholds::default(), expiry, today)
}

/// Classifies remaining shelf life against explicit thresholds.
///
/// Thresholds are inclusive and evaluated in order: expired before critical
/// before use-soon. "Expires today" (zero days) lands in `Critical`.
pub fn classify_with(
    thresholds: &FreshnessThresholds,
    expiry: NaiveDate,
    today: NaiveDate,
) -> ExpiryAssessment {
    let days_remaining = (expiry - today).num_days();

    let status = if days_remaining < 0 {
        FreshnessStatus::Expired
    } else if days_remaining <= i64::from(thresholds.critical_days) {
        FreshnessStatus::Critical
    } else if days_remaining <= i64::from(thresholds.use_soon_days) {
        FreshnessStatus::UseSoon
    } else {
        FreshnessStatus::Fresh
    };

    ExpiryAssessment {
        days_remaining,
        status,
        message: message_for(days_remaining),
    }
}

/// Classifies a raw expiry stamp, tolerating the date shapes stored records
/// carry: `YYYY-MM-DD`, RFC 3339, and bare `YYYY-MM-DDTHH:MM:SS`.
///
/// An unparsable stamp yields the sentinel assessment (expired, zero days,
/// [`ExpiryAssessment::UNREADABLE_MESSAGE`]) rather than an error.
pub fn classify_raw(raw: &str, today: NaiveDate) -> ExpiryAssessment {
    classify_raw_with(&FreshnessThresholds::default(), raw, today)
}

/// [`classify_raw`] with explicit thresholds.
pub fn classify_raw_with(
    thresholds: &FreshnessThresholds,
    raw: &str,
    today: NaiveDate,
) -> ExpiryAssessment {
    match parse_expiry(raw) {
        Some(expiry) => classify_with(thresholds, expiry, today),
        None => ExpiryAssessment::unreadable(),
    }
}

/// Parses supported stamp shapes down to a calendar date, discarding any
/// time-of-day component so day differences stay on calendar granularity.
fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(stamp.date());
    }

    None
}

fn message_for(days_remaining: i64) -> String {
    match days_remaining {
        d if d < 0 => {
            let days_ago = d.unsigned_abs();
            if days_ago == 1 {
                "expired 1 day ago".to_string()
            } else {
                format!("expired {days_ago} days ago")
            }
        }
        0 => "expires today".to_string(),
        1 => "expires tomorrow".to_string(),
        d => format!("{d} days remaining"),
    }
}

/// Percentage of shelf life remaining on the production→expiry span,
/// clamped to 0..=100.
///
/// Display aid only: status always comes from the day thresholds, never from
/// this value.
pub fn shelf_life_percent(production: NaiveDate, expiry: NaiveDate, today: NaiveDate) -> u8 {
    let total = (expiry - production).num_days();
    if total <= 0 {
        return if today < production { 100 } else { 0 };
    }

    let elapsed = (today - production).num_days();
    if elapsed <= 0 {
        return 100;
    }
    if elapsed >= total {
        return 0;
    }

    let remaining = 100.0 - (elapsed as f64 / total as f64) * 100.0;
    remaining.round().clamp(0.0, 100.0) as u8
}
