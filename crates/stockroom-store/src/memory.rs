//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use stockroom_core::{Filter, Item, ItemChanges, ItemId, NewItem, Projection, Record, SortOrder};

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Rows indexed by id.
    rows: BTreeMap<ItemId, Item>,

    /// Highest id ever assigned; ids are never reused.
    last_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>> {
        let columns = projection.columns();
        if columns.is_empty() {
            return Err(StoreError::InvalidData("empty projection".into()));
        }

        let inner = self.read()?;
        let mut records: Vec<Record> = inner
            .rows
            .values()
            .map(Item::to_record)
            .filter(|r| filter.matches(r))
            .collect();
        drop(inner);

        if let Some(order) = order {
            records.sort_by(|a, b| order.compare(a, b));
        }

        Ok(records.into_iter().map(|r| r.project(columns)).collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let inner = self.read()?;
        let n = inner
            .rows
            .values()
            .filter(|item| filter.matches(&item.to_record()))
            .count();
        Ok(n as u64)
    }

    async fn insert(&self, item: &NewItem) -> Result<ItemId> {
        let mut inner = self.write()?;

        let next = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidData("row id space exhausted".into()))?;
        let id = ItemId::new(next);
        inner.last_id = next;
        inner.rows.insert(id, Item::from_new(id, item));

        Ok(id)
    }

    async fn update(&self, changes: &ItemChanges, filter: &Filter) -> Result<u64> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut inner = self.write()?;
        let mut n = 0;
        for item in inner.rows.values_mut() {
            if filter.matches(&item.to_record()) {
                item.apply(changes);
                n += 1;
            }
        }

        Ok(n)
    }

    async fn delete(&self, filter: &Filter) -> Result<u64> {
        let mut inner = self.write()?;
        let before = inner.rows.len();
        inner.rows.retain(|_, item| !filter.matches(&item.to_record()));

        Ok((before - inner.rows.len()) as u64)
    }
}
