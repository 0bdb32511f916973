//! # Stockroom Store
//!
//! Storage abstraction for Stockroom. Provides a trait-based interface for
//! item persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts the `items` table behind the [`Store`] trait,
//! allowing the gateway to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`StoreExt`] - Typed conveniences over `select`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockroom_core::{validate_insert, ItemValues};
//! use stockroom_store::{SqliteStore, Store, StoreExt};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("inventory.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     // Insert a validated row
//!     let item = validate_insert(&ItemValues::new().name("Widget").cost(9.99)).unwrap();
//!     let id = store.insert(&item).await.unwrap();
//!     let stored = store.get_item(id).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Schema**: one table, created on first open; later versions are a no-op
//! - **Identity**: `AUTOINCREMENT` ids, never reused after delete
//! - **Scoped handles**: the connection is taken per statement and released

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt};
