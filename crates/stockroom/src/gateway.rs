//! The Gateway: the single entry point for reading and writing items.

use std::sync::Arc;

use stockroom_core::{
    validate_insert, validate_update, Filter, ItemId, ItemValues, Projection, Record,
    ResourceAddress, Route, Router, SortOrder,
};
use stockroom_store::{SqliteStore, Store};
use tracing::{debug, error, warn};

use crate::config::StockroomConfig;
use crate::error::{GatewayError, Operation, Result};
use crate::notify::{ChangeNotifier, Subscription};

/// URI-addressed access to the items table.
///
/// Every address is classified by the gateway's [`Router`], every write is
/// checked by the validation rules, and every successful mutation is
/// published on the change channel.
pub struct Gateway<S: Store> {
    store: Arc<S>,
    router: Router,
    notifier: ChangeNotifier,
    config: StockroomConfig,
}

impl Gateway<SqliteStore> {
    /// Open the SQLite database named by `config`.
    pub fn open(config: StockroomConfig) -> Result<Self> {
        config.validate()?;
        let store = if config.is_in_memory() {
            SqliteStore::open_memory()?
        } else {
            SqliteStore::open(&config.database)?
        };
        Ok(Self::new(store, config))
    }
}

impl<S: Store> Gateway<S> {
    /// Wrap an existing store.
    pub fn new(store: S, config: StockroomConfig) -> Self {
        Self {
            store: Arc::new(store),
            router: Router::new(config.authority.clone()),
            notifier: ChangeNotifier::new(config.notify_capacity),
            config,
        }
    }

    /// Wrap an existing store with default configuration.
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, StockroomConfig::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &StockroomConfig {
        &self.config
    }

    /// The collection address.
    pub fn collection(&self) -> ResourceAddress {
        self.router.collection()
    }

    /// The address of one item.
    pub fn item_address(&self, id: ItemId) -> ResourceAddress {
        self.router.item(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read rows.
    ///
    /// On an item address `filter` is replaced by the row's id; on the
    /// collection it is used as given. No ordering means ascending id.
    pub async fn query(
        &self,
        address: &ResourceAddress,
        projection: &Projection,
        filter: Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>> {
        let filter = self.narrow(address, filter)?;
        let rows = self.store.select(projection, &filter, order).await?;
        debug!(%address, rows = rows.len(), "query");
        Ok(rows)
    }

    /// Insert a row into the collection. Returns the new row's address.
    pub async fn insert(
        &self,
        address: &ResourceAddress,
        values: &ItemValues,
    ) -> Result<ResourceAddress> {
        if let Route::Item(_) = self.router.route(address)? {
            return Err(GatewayError::UnsupportedOperation {
                operation: Operation::Insert,
                address: address.clone(),
            });
        }

        let item = validate_insert(values).map_err(|e| {
            warn!(%address, error = %e, "insert rejected");
            e
        })?;

        let id = match self.store.insert(&item).await {
            Ok(id) => id,
            Err(e) => {
                error!(%address, error = %e, "failed to insert row");
                return Err(e.into());
            }
        };

        self.notifier.notify(address);
        let inserted = address.with_appended_id(id);
        debug!(address = %inserted, "inserted");
        Ok(inserted)
    }

    /// Update matching rows. Returns the number of rows changed.
    ///
    /// An empty change-set is a successful no-op that touches no rows.
    pub async fn update(
        &self,
        address: &ResourceAddress,
        values: &ItemValues,
        filter: Filter,
    ) -> Result<u64> {
        let filter = self.narrow(address, filter)?;
        let changes = validate_update(values).map_err(|e| {
            warn!(%address, error = %e, "update rejected");
            e
        })?;
        if changes.is_empty() {
            return Ok(0);
        }

        let updated = self.store.update(&changes, &filter).await?;
        if updated > 0 {
            self.notifier.notify(address);
        }
        debug!(%address, updated, "update");
        Ok(updated)
    }

    /// Delete matching rows. Returns the number of rows removed.
    pub async fn delete(&self, address: &ResourceAddress, filter: Filter) -> Result<u64> {
        let filter = self.narrow(address, filter)?;
        let deleted = self.store.delete(&filter).await?;
        if deleted > 0 {
            self.notifier.notify(address);
        }
        debug!(%address, deleted, "delete");
        Ok(deleted)
    }

    /// MIME-style type of an address, without touching storage.
    pub fn content_type(&self, address: &ResourceAddress) -> Result<String> {
        let kind = self.router.content_type(address)?;
        Ok(kind.mime(self.router.authority()))
    }

    /// Watch an address for changes. See [`crate::notify`] for which
    /// changes are delivered.
    pub fn subscribe(&self, address: &ResourceAddress, descendants: bool) -> Subscription {
        self.notifier.subscribe(address.clone(), descendants)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Route `address`, pinning the filter to one id for item addresses.
    fn narrow(&self, address: &ResourceAddress, filter: Filter) -> Result<Filter> {
        Ok(match self.router.route(address)? {
            Route::Collection => filter,
            Route::Item(id) => Filter::id(id),
        })
    }

    /// The id behind an item address; collection addresses are refused.
    pub(crate) fn require_item(
        &self,
        address: &ResourceAddress,
        operation: Operation,
    ) -> Result<ItemId> {
        match self.router.route(address)? {
            Route::Item(id) => Ok(id),
            Route::Collection => Err(GatewayError::UnsupportedOperation {
                operation,
                address: address.clone(),
            }),
        }
    }
}
