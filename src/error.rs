//! Error types for the tail pipeline

use thiserror::Error;

/// Main error type for tail operations
#[derive(Debug, Error)]
pub enum TailError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Failed to list shards: {0}")]
    ListShardsFailed(String),

    #[error("Failed to get iterator: {0}")]
    GetIteratorFailed(String),

    #[error("Failed to get records: {0}")]
    GetRecordsFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for tail operations
pub type Result<T> = std::result::Result<T, TailError>;
