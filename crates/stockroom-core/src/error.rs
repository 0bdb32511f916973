//! Error types for Stockroom Core.

use thiserror::Error;

use crate::types::Column;

/// Core errors raised when materializing typed values from raw records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("record is missing column {0}")]
    MissingColumn(Column),

    #[error("column {column} holds {found}, expected {expected}")]
    ColumnType {
        column: Column,
        expected: &'static str,
        found: &'static str,
    },
}

/// Field-level rejections raised before any mutation reaches the store.
///
/// The `Display` text of each variant is a short human-readable reason
/// suitable for showing to the end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("cost required")]
    CostRequired,

    #[error("cost must not be negative (got {0})")]
    NegativeCost(f64),

    #[error("quantity required")]
    QuantityRequired,

    #[error("quantity must not be negative (got {0})")]
    NegativeQuantity(i64),

    #[error("{column} is not a valid number: {value}")]
    InvalidNumber { column: Column, value: String },

    #[error("{column} expects {expected}, got {found}")]
    InvalidType {
        column: Column,
        expected: &'static str,
        found: &'static str,
    },

    #[error("item id is assigned by the store and cannot be written")]
    ImmutableId,
}

/// Resource address failures. Always fatal to the calling operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("malformed resource address: {0}")]
    Malformed(String),

    #[error("unknown resource address: {0}")]
    UnknownResource(String),
}

/// Image codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("png decoding failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("unsupported image layout: {0}")]
    Unsupported(String),

    #[error("pixel buffer holds {actual} bytes, image dimensions require {expected}")]
    PixelMismatch { expected: usize, actual: usize },
}
