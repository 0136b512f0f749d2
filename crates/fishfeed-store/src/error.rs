//! Error types for the bracket store.

use thiserror::Error;

use fishfeed_core::BracketError;

/// Result type alias for bracket store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("feeding schedule not found: {0}")]
    NotFound(String),

    #[error("duplicate bracket in batch: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Invalid(#[from] BracketError),
}
