use crate::error::CoreError;
use crate::signature::Signature;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a signature is computed over.
///
/// Constructed fresh for every request and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningInput {
    /// HTTP verb, exactly as the caller supplied it. Case is significant.
    pub method: String,
    /// Request path, optionally with a query string.
    pub url: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl SigningInput {
    pub fn new(url: impl Into<String>, method: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            timestamp_ms,
        }
    }

    /// Builds an input stamped with the given wall-clock time.
    ///
    /// Times before the Unix epoch cannot be represented and are rejected.
    pub fn at(
        url: impl Into<String>,
        method: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let millis = time.timestamp_millis();
        let timestamp_ms = u64::try_from(millis).map_err(|_| {
            CoreError::InvalidInput(
                "timestamp".to_string(),
                format!("{} is before the Unix epoch", millis),
            )
        })?;

        Ok(Self::new(url, method, timestamp_ms))
    }

    /// Builds an input stamped with the current time.
    pub fn now(url: impl Into<String>, method: impl Into<String>) -> Result<Self, CoreError> {
        Self::at(url, method, Utc::now())
    }
}

/// The record of one completed signing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedRequest {
    pub method: String,
    /// The path that was actually signed, after normalization.
    pub path: String,
    pub timestamp_ms: u64,
    /// The exact text the MAC was computed over.
    pub message: String,
    pub signature: Signature,
}
