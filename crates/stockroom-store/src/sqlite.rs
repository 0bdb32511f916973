//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Stockroom. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection};

use stockroom_core::{
    Column, Direction, Filter, ItemChanges, ItemId, NewItem, Projection, Record, SortOrder, Value,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::Store;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Every operation takes the connection for
/// the duration of one statement and releases it before returning; no handle
/// is held across calls.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| StoreError::Poisoned(e.to_string()))
}

// Helper to convert a core value to a bindable parameter
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}

// Helper to convert a result cell back to a core value
fn from_sql(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(Bytes::copy_from_slice(b)),
    }
}

/// Render ` WHERE a = ? AND b < ?`, pushing one parameter per condition.
fn where_clause(filter: &Filter, params: &mut Vec<SqlValue>) -> String {
    if filter.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = filter
        .conditions()
        .iter()
        .map(|c| {
            params.push(to_sql(&c.value));
            format!("{} {} ?", c.column.name(), c.op.sql())
        })
        .collect();
    format!(" WHERE {}", parts.join(" AND "))
}

fn order_clause(order: Option<SortOrder>) -> String {
    match order {
        Some(o) => {
            let dir = match o.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            format!(" ORDER BY {} {}", o.column.name(), dir)
        }
        None => " ORDER BY id ASC".to_owned(),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>> {
        let columns: Vec<Column> = projection.columns().to_vec();
        if columns.is_empty() {
            return Err(StoreError::InvalidData("empty projection".into()));
        }

        let mut params = Vec::new();
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        let sql = format!(
            "SELECT {} FROM items{}{}",
            names.join(", "),
            where_clause(filter, &mut params),
            order_clause(order),
        );

        self.run(move |conn| {
            tracing::trace!(%sql, "select");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
                let mut record = Record::new();
                for (i, column) in columns.iter().enumerate() {
                    record.insert(*column, from_sql(row.get_ref(i)?));
                }
                Ok(record)
            })?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let mut params = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM items{}",
            where_clause(filter, &mut params)
        );

        self.run(move |conn| {
            let n: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
            Ok(n as u64)
        })
        .await
    }

    async fn insert(&self, item: &NewItem) -> Result<ItemId> {
        let item = item.clone();

        self.run(move |conn| {
            conn.execute(
                "INSERT INTO items (name, cost, quantity, image) VALUES (?1, ?2, ?3, ?4)",
                params![
                    item.name(),
                    item.cost(),
                    item.quantity(),
                    item.image().map(|b| b.to_vec()),
                ],
            )?;
            let id = ItemId::new(conn.last_insert_rowid());
            tracing::trace!(%id, "inserted row");
            Ok(id)
        })
        .await
    }

    async fn update(&self, changes: &ItemChanges, filter: &Filter) -> Result<u64> {
        let assignments = changes.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut params: Vec<SqlValue> = Vec::with_capacity(assignments.len());
        let set: Vec<String> = assignments
            .iter()
            .map(|(column, value)| {
                params.push(to_sql(value));
                format!("{} = ?", column.name())
            })
            .collect();
        let sql = format!(
            "UPDATE items SET {}{}",
            set.join(", "),
            where_clause(filter, &mut params)
        );

        self.run(move |conn| {
            tracing::trace!(%sql, "update");
            let n = conn.execute(&sql, params_from_iter(params.iter()))?;
            Ok(n as u64)
        })
        .await
    }

    async fn delete(&self, filter: &Filter) -> Result<u64> {
        let mut params = Vec::new();
        let sql = format!("DELETE FROM items{}", where_clause(filter, &mut params));

        self.run(move |conn| {
            tracing::trace!(%sql, "delete");
            let n = conn.execute(&sql, params_from_iter(params.iter()))?;
            Ok(n as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;
    use stockroom_core::{validate_insert, validate_update, ItemValues, Op};

    fn new_item(name: &str, cost: f64, quantity: i64) -> NewItem {
        validate_insert(&ItemValues::new().name(name).cost(cost).quantity(quantity)).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_item() {
        let store = SqliteStore::open_memory().unwrap();

        let id = store.insert(&new_item("Widget", 9.99, 10)).await.unwrap();
        assert_eq!(id, ItemId::new(1));

        let item = store.get_item(id).await.unwrap().unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.cost, 9.99);
        assert_eq!(item.quantity, 10);
        assert!(item.image.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = SqliteStore::open_memory().unwrap();

        let first = store.insert(&new_item("A", 1.0, 1)).await.unwrap();
        store.delete(&Filter::id(first)).await.unwrap();
        let second = store.insert(&new_item("B", 1.0, 1)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_projection_and_order() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(&new_item("Bolt", 0.25, 100)).await.unwrap();
        store.insert(&new_item("Anvil", 120.0, 2)).await.unwrap();

        let projection = Projection::from(vec![Column::Id, Column::Name]);
        let rows = store
            .select(&projection, &Filter::all(), Some(SortOrder::asc(Column::Name)))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(Column::Name), Some(&Value::from("Anvil")));
        assert_eq!(rows[0].get(Column::Cost), None);
        assert_eq!(rows[1].id(), Some(ItemId::new(1)));
    }

    #[tokio::test]
    async fn test_filtered_update_and_count() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(&new_item("Bolt", 0.25, 100)).await.unwrap();
        store.insert(&new_item("Nut", 0.10, 3)).await.unwrap();
        store.insert(&new_item("Anvil", 120.0, 2)).await.unwrap();

        let low_stock = Filter::all().and(Column::Quantity, Op::Lt, 5i64);
        assert_eq!(store.count(&low_stock).await.unwrap(), 2);

        let changes = validate_update(&ItemValues::new().quantity(50)).unwrap();
        assert_eq!(store.update(&changes, &low_stock).await.unwrap(), 2);
        assert_eq!(store.count(&low_stock).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_zero() {
        let store = SqliteStore::open_memory().unwrap();
        let changes = validate_update(&ItemValues::new().quantity(1)).unwrap();
        let n = store.update(&changes, &Filter::id(ItemId::new(99))).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_image_blob_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let blob = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
        let item = validate_insert(
            &ItemValues::new().name("Lamp").cost(15.0).image(blob.clone()),
        )
        .unwrap();

        let id = store.insert(&item).await.unwrap();
        let stored = store.get_item(id).await.unwrap().unwrap();
        assert_eq!(stored.image.as_deref(), Some(blob.as_slice()));

        let clear = validate_update(&ItemValues::new().null(Column::Image)).unwrap();
        store.update(&clear, &Filter::id(id)).await.unwrap();
        assert!(store.get_item(id).await.unwrap().unwrap().image.is_none());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let store = SqliteStore::open_memory().unwrap();
        for i in 0..4 {
            store.insert(&new_item("Item", 1.0, i)).await.unwrap();
        }
        assert_eq!(store.delete(&Filter::all()).await.unwrap(), 4);
        assert!(store.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&new_item("Widget", 9.99, 10)).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let items = store.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Widget");
    }
}
