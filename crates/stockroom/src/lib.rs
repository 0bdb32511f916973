//! # Stockroom
//!
//! A URI-addressed data gateway over an inventory `items` table.
//!
//! This crate re-exports the core types and provides the [`Gateway`]:
//! routing, validation, storage and change notification behind four
//! operations (query, insert, update, delete) plus the inventory actions
//! built on them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockroom::{Gateway, StockroomConfig};
//! use stockroom::core::{Filter, ItemValues, Projection};
//!
//! async fn example() -> stockroom::Result<()> {
//!     let gateway = Gateway::open(StockroomConfig::in_memory())?;
//!
//!     let widget = gateway
//!         .insert(
//!             &gateway.collection(),
//!             &ItemValues::new().name("Widget").cost(2.5).quantity(10),
//!         )
//!         .await?;
//!
//!     let mut changes = gateway.subscribe(&widget, false);
//!     gateway.sell(&widget, 3).await?;
//!     let _event = changes.changed().await;
//!
//!     let rows = gateway
//!         .query(&gateway.collection(), &Projection::All, Filter::all(), None)
//!         .await?;
//!     assert_eq!(rows.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `stockroom-core`: Items, addresses, validation, PNG codec (no I/O)
//! - `stockroom-store`: Storage trait and SQLite implementation
//! - `stockroom`: This crate (unified API)

pub mod actions;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod notify;

// Re-export sub-crates
pub use stockroom_core as core;
pub use stockroom_store as store;

// Re-export main types
pub use actions::OrderRequest;
pub use config::{LogFormat, LoggingConfig, StockroomConfig, SupplierConfig, MEMORY_DATABASE};
pub use error::{GatewayError, Operation, Result};
pub use gateway::Gateway;
pub use logging::init_logging;
pub use notify::{ChangeEvent, ChangeNotifier, Interest, Subscription};

// Re-export commonly used core types
pub use stockroom_core::{
    Column, Filter, Item, ItemId, ItemValues, Projection, Record, ResourceAddress, SortOrder,
    Value,
};
