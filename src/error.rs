//! Error types for decoy-honeypot

use thiserror::Error;

/// Errors that can occur in the honeypot
///
/// Generation and streaming never fail; these cover configuration,
/// provisioning, alert delivery, and the receiver service.
#[derive(Debug, Error)]
pub enum HoneypotError {
    /// Per-row delay outside the accepted range
    #[error("Invalid delay value: {value}ms (must be between 0 and {max}ms)")]
    InvalidDelay { value: u32, max: u32 },

    /// Unrecognized data category name
    #[error("Unknown data category: {0}")]
    UnknownCategory(String),

    /// Table name is not a plain identifier
    #[error("Invalid table name: '{0}'")]
    InvalidTableName(String),

    /// Decoy table already provisioned
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Decoy table not provisioned
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Alert delivery failure (connection error, timeout, non-2xx)
    #[error("Failed to deliver alert to '{endpoint}': {reason}")]
    Delivery { endpoint: String, reason: String },

    /// Alert journal read/write failure
    #[error("Journal error: {0}")]
    Journal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server bind/serve failure
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for honeypot operations
pub type Result<T> = std::result::Result<T, HoneypotError>;
