//! Error types for the call ledger
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the call ledger.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key-value store could not be reached
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The store answered but rejected the command
    #[error("Backend error: {0}")]
    Backend(String),

    /// A TTL too short for the backend to express
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// A stored value could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The remote resource could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

// == Conversions ==
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            CacheError::BackendUnavailable(err.to_string())
        } else {
            CacheError::Backend(err.to_string())
        }
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the call ledger.
pub type Result<T> = std::result::Result<T, CacheError>;
