//! Error types for the store module.

use stockroom_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite, including constraint violations.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be materialized.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] CoreError),

    /// Invalid data in storage or in a request.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The connection lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running the statement failed to complete.
    #[error("store task failed: {0}")]
    TaskFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
