//! # Stockroom Core
//!
//! Pure primitives for Stockroom: items, change-sets, resource addresses and
//! validation.
//!
//! This crate contains no storage and no networking. It is pure computation
//! over the item data model.
//!
//! ## Key Types
//!
//! - [`Item`] - A fully materialized inventory row
//! - [`ItemValues`] - A raw change-set, as supplied by a caller
//! - [`NewItem`] / [`ItemChanges`] - Validated insert and update payloads
//! - [`ResourceAddress`] / [`Router`] / [`Route`] - Address parsing and classification
//! - [`Filter`] / [`Projection`] / [`SortOrder`] - Query shapes
//!
//! ## Validation
//!
//! Every write passes through [`validate_insert`] or [`validate_update`]
//! before it reaches a store. See the [`validation`] module.

pub mod address;
pub mod codec;
pub mod error;
pub mod query;
pub mod types;
pub mod validation;

pub use address::{ContentType, ResourceAddress, Route, Router, ITEMS_PATH, SCHEME};
pub use codec::{decode_png, encode_png, PixelFormat, RasterImage};
pub use error::{CodecError, CoreError, RouteError, ValidationError};
pub use query::{Condition, Direction, Filter, Op, Projection, SortOrder};
pub use types::{Column, Item, ItemChanges, ItemId, ItemValues, NewItem, Record, Value};
pub use validation::{validate_insert, validate_update};
