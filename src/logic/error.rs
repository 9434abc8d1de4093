//! Error types
//!
//! Only resource and configuration problems are errors. Missing or malformed
//! order data is a risk signal and never becomes a `ShieldError`.

use thiserror::Error;

pub type ShieldResult<T> = Result<T, ShieldError>;

#[derive(Debug, Error)]
pub enum ShieldError {
    /// Log partition, stats or config file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration rejected at construction or admin update
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Alert transport failed to deliver
    #[error("Alert transport error: {0}")]
    Transport(String),
}
