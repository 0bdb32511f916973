//! Inventory actions built on the four gateway operations.
//!
//! These are the screen-level workflows of the app: selling from stock,
//! receiving a delivery, clearing the table and drafting a re-order email.
//! Each goes through [`Gateway::query`] / [`Gateway::update`] /
//! [`Gateway::delete`], so validation and change notification apply as for
//! any other caller.

use stockroom_core::{Filter, Item, ItemValues, Projection, ResourceAddress};
use stockroom_store::Store;
use tracing::info;

use crate::error::{GatewayError, Operation, Result};
use crate::gateway::Gateway;

/// A drafted email asking the supplier for more stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl<S: Store> Gateway<S> {
    /// Read one item, or `None` if no row lives at the address.
    pub async fn item(&self, address: &ResourceAddress) -> Result<Option<Item>> {
        self.require_item(address, Operation::Query)?;
        self.fetch_item(address).await
    }

    async fn fetch_item(&self, address: &ResourceAddress) -> Result<Option<Item>> {
        let rows = self
            .query(address, &Projection::All, Filter::all(), None)
            .await?;
        match rows.first() {
            Some(record) => Ok(Some(Item::try_from(record)?)),
            None => Ok(None),
        }
    }

    /// Read every item in ascending id order.
    pub async fn items(&self) -> Result<Vec<Item>> {
        let rows = self
            .query(&self.collection(), &Projection::All, Filter::all(), None)
            .await?;
        let items = rows
            .iter()
            .map(Item::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Sell `amount` units. Refuses to go below zero stock.
    pub async fn sell(&self, address: &ResourceAddress, amount: i64) -> Result<Item> {
        let item = self.stocked_item(address, amount, Operation::Update).await?;
        if amount > item.quantity {
            return Err(GatewayError::InsufficientStock {
                requested: amount,
                available: item.quantity,
            });
        }
        let item = self.set_quantity(address, item, |q| q - amount).await?;
        info!(%address, amount, remaining = item.quantity, "sold");
        Ok(item)
    }

    /// Add `amount` delivered units to stock.
    pub async fn receive(&self, address: &ResourceAddress, amount: i64) -> Result<Item> {
        let item = self.stocked_item(address, amount, Operation::Update).await?;
        let total = item
            .quantity
            .checked_add(amount)
            .ok_or(GatewayError::InvalidAmount(amount))?;
        let item = self.set_quantity(address, item, |_| total).await?;
        info!(%address, amount, stock = item.quantity, "received");
        Ok(item)
    }

    /// Sell a single unit if any are in stock.
    ///
    /// Returns the number of rows changed: 0 when the item is out of stock.
    pub async fn sell_one(&self, address: &ResourceAddress) -> Result<u64> {
        let item = self.stocked_item(address, 1, Operation::Update).await?;
        if item.quantity <= 0 {
            return Ok(0);
        }
        let values = ItemValues::new().quantity(item.quantity - 1);
        self.update(address, &values, Filter::all()).await
    }

    /// Remove every row. Returns how many were deleted.
    pub async fn delete_all(&self) -> Result<u64> {
        let deleted = self.delete(&self.collection(), Filter::all()).await?;
        info!(deleted, "inventory cleared");
        Ok(deleted)
    }

    /// Draft a re-order email for `amount` more units of an item.
    pub async fn order_request(
        &self,
        address: &ResourceAddress,
        amount: i64,
    ) -> Result<OrderRequest> {
        let item = self.stocked_item(address, amount, Operation::Query).await?;
        let supplier = &self.config().supplier;
        Ok(OrderRequest {
            recipient: supplier.email.clone(),
            subject: supplier.subject.clone(),
            body: format!(
                "Hello, we are requesting: \n\nItem: {}\nQuantity: {}\nPrice: ${:.2} each\n\nPlease charge our account for the costs.",
                item.name, amount, item.cost
            ),
        })
    }

    /// Check `amount` and load the item it applies to.
    async fn stocked_item(
        &self,
        address: &ResourceAddress,
        amount: i64,
        operation: Operation,
    ) -> Result<Item> {
        if amount <= 0 {
            return Err(GatewayError::InvalidAmount(amount));
        }
        self.require_item(address, operation)?;
        self.fetch_item(address)
            .await?
            .ok_or_else(|| GatewayError::NotFound(address.clone()))
    }

    async fn set_quantity(
        &self,
        address: &ResourceAddress,
        mut item: Item,
        quantity: impl FnOnce(i64) -> i64,
    ) -> Result<Item> {
        item.quantity = quantity(item.quantity);
        let values = ItemValues::new().quantity(item.quantity);
        if self.update(address, &values, Filter::all()).await? == 0 {
            return Err(GatewayError::NotFound(address.clone()));
        }
        Ok(item)
    }
}
