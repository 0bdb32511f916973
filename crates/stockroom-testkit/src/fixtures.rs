//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use stockroom::{Gateway, StockroomConfig};
use stockroom_core::{encode_png, ItemValues, PixelFormat, RasterImage, ResourceAddress};
use stockroom_store::{MemoryStore, SqliteStore, Store};

/// A gateway over a fresh store.
pub struct TestFixture<S: Store = MemoryStore> {
    pub gateway: Gateway<S>,
}

impl TestFixture<MemoryStore> {
    /// Create a fixture backed by a memory store.
    pub fn new() -> Self {
        Self {
            gateway: Gateway::new(MemoryStore::new(), StockroomConfig::in_memory()),
        }
    }
}

impl TestFixture<SqliteStore> {
    /// Create a fixture backed by an in-memory SQLite database.
    pub fn sqlite() -> Self {
        let gateway =
            Gateway::open(StockroomConfig::in_memory()).expect("open in-memory database");
        Self { gateway }
    }
}

impl<S: Store> TestFixture<S> {
    /// The collection address.
    pub fn collection(&self) -> ResourceAddress {
        self.gateway.collection()
    }

    /// Insert an item and return its address.
    pub async fn add_item(&self, name: &str, cost: f64, quantity: i64) -> ResourceAddress {
        let values = ItemValues::new().name(name).cost(cost).quantity(quantity);
        self.gateway
            .insert(&self.gateway.collection(), &values)
            .await
            .expect("insert fixture item")
    }

    /// Insert several items, returning their addresses in order.
    pub async fn stock(&self, items: &[(&str, f64, i64)]) -> Vec<ResourceAddress> {
        let mut addresses = Vec::with_capacity(items.len());
        for (name, cost, quantity) in items {
            addresses.push(self.add_item(name, *cost, *quantity).await);
        }
        addresses
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical sample row: a Widget costing 2.5 with 10 in stock.
pub fn widget() -> ItemValues {
    ItemValues::new().name("Widget").cost(2.5).quantity(10)
}

/// A small RGB checkerboard.
pub fn sample_raster() -> RasterImage {
    let (width, height) = (4u32, 3u32);
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let color: [u8; 3] = if (x + y) % 2 == 0 {
                [255, 0, 0]
            } else {
                [0, 0, 255]
            };
            pixels.extend_from_slice(&color);
        }
    }
    RasterImage::new(width, height, PixelFormat::Rgb, pixels).expect("checkerboard dimensions")
}

/// [`sample_raster`] as PNG bytes.
pub fn sample_png() -> Bytes {
    encode_png(&sample_raster()).expect("encode checkerboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::decode_png;

    #[tokio::test]
    async fn test_fixture_stock() {
        let fixture = TestFixture::new();
        let addresses = fixture
            .stock(&[("Nut", 0.1, 100), ("Bolt", 0.25, 40)])
            .await;

        assert_eq!(addresses.len(), 2);
        assert_eq!(fixture.gateway.items().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sqlite_fixture() {
        let fixture = TestFixture::sqlite();
        let address = fixture.add_item("Widget", 2.5, 10).await;
        let item = fixture.gateway.item(&address).await.unwrap().unwrap();
        assert_eq!(item.name, "Widget");
    }

    #[test]
    fn test_sample_png_decodes() {
        assert_eq!(decode_png(&sample_png()).unwrap(), sample_raster());
    }
}
