//! Store trait: the abstract interface for item persistence.
//!
//! This trait allows the gateway to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use stockroom_core::{Filter, Item, ItemChanges, ItemId, NewItem, Projection, Record, SortOrder};

use crate::error::Result;

/// The Store trait: async interface for item persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Validated input only**: writes take [`NewItem`] / [`ItemChanges`], which
///   can only be built by the validation rules. The schema's own constraints
///   still apply underneath.
/// - **Counts, not errors**: an update or delete that matches nothing returns 0.
/// - **Monotonic ids**: a deleted row's id is never handed out again.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Select rows matching `filter`, projected to `projection`.
    ///
    /// An empty filter scans the whole table. Without an order, rows come back
    /// in id order.
    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>>;

    /// Count rows matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a row and return its newly assigned id.
    async fn insert(&self, item: &NewItem) -> Result<ItemId>;

    /// Apply `changes` to every row matching `filter`.
    ///
    /// # Returns
    /// The number of rows affected; 0 when nothing matched or `changes` is empty.
    async fn update(&self, changes: &ItemChanges, filter: &Filter) -> Result<u64>;

    /// Remove every row matching `filter`, returning how many went.
    async fn delete(&self, filter: &Filter) -> Result<u64>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Fetch one fully materialized item by id.
    fn get_item(
        &self,
        id: ItemId,
    ) -> impl std::future::Future<Output = Result<Option<Item>>> + Send;

    /// Fetch every item, in id order.
    fn list_items(&self) -> impl std::future::Future<Output = Result<Vec<Item>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        let records = self
            .select(&Projection::All, &Filter::id(id), None)
            .await?;
        match records.first() {
            Some(record) => Ok(Some(Item::try_from(record)?)),
            None => Ok(None),
        }
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let records = self.select(&Projection::All, &Filter::all(), None).await?;
        records
            .iter()
            .map(|r| Item::try_from(r).map_err(Into::into))
            .collect()
    }
}
