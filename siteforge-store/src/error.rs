//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error on the attributes column.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An identifier (table or column name) failed the allow-list check.
    /// User input must never reach this; it guards against caller bugs.
    #[error("unsafe identifier: {0}")]
    UnsafeIdentifier(String),

    /// Row content that cannot be mapped back to a record.
    #[error("invalid row data: {0}")]
    InvalidData(String),
}
