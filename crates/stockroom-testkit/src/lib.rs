//! # Stockroom Testkit
//!
//! Testing utilities for Stockroom.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Gateways over fresh stores, sample rows and images
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stockroom_core::validate_insert;
//! use stockroom_testkit::generators::invalid_item_values;
//!
//! proptest! {
//!     #[test]
//!     fn bad_rows_never_validate(values in invalid_item_values()) {
//!         prop_assert!(validate_insert(&values).is_err());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use stockroom_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let widget = fixture.add_item("Widget", 2.5, 10).await;
//! # }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_png, sample_raster, widget, TestFixture};
pub use generators::{invalid_item_values, valid_item_values, ItemParams};
