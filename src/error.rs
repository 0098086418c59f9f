//! Error types shared across the crate

use thiserror::Error;

/// Errors raised by the projection engine and the calculators built on it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// An input lies outside the domain the engine accepts
    #[error("invalid projection input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        ProjectionError::InvalidInput { field, value, reason }
    }
}

/// Errors from a key-value store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O failure (file-backed store)
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backend
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from fetching a live exchange rate
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request could not be completed (includes timeouts)
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Endpoint answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response lacks the requested currency
    #[error("currency {0} missing from response")]
    MissingCurrency(String),

    /// Rate present but unusable
    #[error("invalid rate: {0}")]
    InvalidRate(f64),
}
