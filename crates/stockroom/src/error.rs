//! Error types for the Gateway.

use std::fmt;

use stockroom_core::{CoreError, ResourceAddress, RouteError, ValidationError};
use stockroom_store::StoreError;
use thiserror::Error;

/// The four gateway operations, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Query => "query",
            Operation::Insert => "insertion",
            Operation::Update => "update",
            Operation::Delete => "deletion",
        })
    }
}

/// Errors that can occur during Gateway operations.
///
/// None of these are retried internally; each propagates straight to the
/// caller of the operation that raised it.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A field is missing, null, mistyped or out of bounds.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The address matches neither the collection nor a single item.
    #[error(transparent)]
    UnknownResource(#[from] RouteError),

    /// The address kind does not support the operation.
    #[error("{operation} is not supported for {address}")]
    UnsupportedOperation {
        operation: Operation,
        address: ResourceAddress,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored row could not be read back as an item.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] CoreError),

    /// No row lives at the address.
    #[error("item not found: {0}")]
    NotFound(ResourceAddress),

    /// A sale asked for more units than are in stock.
    #[error("cannot sell {requested}, only {available} in stock")]
    InsufficientStock { requested: i64, available: i64 },

    /// A sell / receive / order amount that is not a positive count.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// Configuration could not be read or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<toml::de::Error> for GatewayError {
    fn from(e: toml::de::Error) -> Self {
        GatewayError::Config(e.to_string())
    }
}

/// Result type for Gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
