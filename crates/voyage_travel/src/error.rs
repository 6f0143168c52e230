//! Error types for the travel collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Failures loading the city table.
#[derive(Debug, Error)]
pub enum CityTableError {
    /// The table file could not be read.
    #[error("failed to read city table {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The table is not a JSON object of city name to code.
    #[error("city table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a flight or hotel search backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// No search backend is configured.
    #[error("search is not configured (missing API key)")]
    NotConfigured,

    /// Transport failure.
    #[error("search request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("search backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The backend reported an error in its payload.
    #[error("search backend error: {0}")]
    Api(String),

    /// The payload could not be interpreted.
    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}

/// Failures of the booking store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation.
    #[error("booking store unavailable: {0}")]
    Unavailable(String),
}

/// Failures creating a payment order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The gateway rejected the order.
    #[error("payment order rejected: {0}")]
    Rejected(String),

    /// The gateway could not be reached.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}
