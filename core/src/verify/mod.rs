//! Remote verification collaborator.
//!
//! The verification service answers whether an identifier is on file and what
//! expiry data it holds. Failures are ordinary values here: a dead or slow
//! backend degrades to [`VerifyError::Unavailable`], it never takes the
//! caller down. Callers re-derive the canonical assessment locally from the
//! returned expiry date; the remote's own status string is informational.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::types::ProductIdentifier;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The service answered and knows no such product.
    #[error("product not found")]
    NotFound,

    /// Timeout, refused connection, or a malformed answer.
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

/// The remote service's view of one product.
#[cfg_attr(test, derive(PartialEq))]
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVerification {
    pub product_name: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub days_left: Option<i64>,
    #[serde(default)]
    pub days_overdue: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

pub trait Verify {
    fn verify(&self, id: &ProductIdentifier) -> Result<RemoteVerification, VerifyError>;
}

/// Blocking HTTP client for the verification endpoint.
pub struct HttpVerifier {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpVerifier {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(base_url: impl Into<String>) -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Reachability probe: any answer counts, including "not found".
    pub fn ping(&self) -> bool {
        match self.verify_raw("connection-probe") {
            Ok(_) | Err(VerifyError::NotFound) => true,
            Err(_) => false,
        }
    }

    fn verify_raw(&self, id: &str) -> Result<RemoteVerification, VerifyError> {
        let url = format!("{}/products/verify", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("url", id)])
            .send()
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(VerifyError::NotFound);
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        parse_answer(body)
    }
}

impl Verify for HttpVerifier {
    fn verify(&self, id: &ProductIdentifier) -> Result<RemoteVerification, VerifyError> {
        let result = self.verify_raw(id.as_str());
        if let Err(error) = &result {
            tracing::warn!(%id, %error, "verification failed");
        }
        result
    }
}

/// Interprets the service's answer: a JSON body with an `error` field means
/// "not found", anything else must deserialize into a verification.
fn parse_answer(body: serde_json::Value) -> Result<RemoteVerification, VerifyError> {
    if body.get("error").is_some_and(|e| !e.is_null()) {
        return Err(VerifyError::NotFound);
    }

    serde_json::from_value(body).map_err(|e| VerifyError::Unavailable(e.to_string()))
}
