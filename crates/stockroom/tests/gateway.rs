//! End-to-end behavior of the gateway over SQLite.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use stockroom::core::{
    decode_png, Column, Filter, ItemChanges, ItemId, ItemValues, NewItem, Op, Projection, Record,
    SortOrder, Value,
};
use stockroom::store::{Store, StoreError};
use stockroom::{Gateway, GatewayError, StockroomConfig};
use stockroom_testkit::{
    invalid_item_values, sample_png, sample_raster, widget, ItemParams, TestFixture,
};

/// A store whose disk is full: reads see an empty table, inserts fail.
struct FullDisk;

#[async_trait]
impl Store for FullDisk {
    async fn select(
        &self,
        _projection: &Projection,
        _filter: &Filter,
        _order: Option<SortOrder>,
    ) -> stockroom::store::Result<Vec<Record>> {
        Ok(Vec::new())
    }

    async fn count(&self, _filter: &Filter) -> stockroom::store::Result<u64> {
        Ok(0)
    }

    async fn insert(&self, _item: &NewItem) -> stockroom::store::Result<ItemId> {
        Err(StoreError::InvalidData("database or disk is full".into()))
    }

    async fn update(
        &self,
        _changes: &ItemChanges,
        _filter: &Filter,
    ) -> stockroom::store::Result<u64> {
        Ok(0)
    }

    async fn delete(&self, _filter: &Filter) -> stockroom::store::Result<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn widget_round_trip() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;

    let address = gw.insert(&gw.collection(), &widget()).await?;
    assert_eq!(address.to_string(), "content://com.example.stockroom/items/1");
    assert_eq!(
        gw.content_type(&address)?,
        "vnd.stockroom.item/com.example.stockroom/items"
    );

    let item = gw.item(&address).await?.expect("widget stored");
    assert_eq!(item.name, "Widget");
    assert_eq!(item.cost, 2.5);
    assert_eq!(item.quantity, 10);
    assert_eq!(item.image, None);
    Ok(())
}

#[tokio::test]
async fn widget_lifecycle() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;

    let address = gw.insert(&gw.collection(), &widget()).await?;
    assert_eq!(address.to_string(), "content://com.example.stockroom/items/1");

    let seven = ItemValues::new().quantity(7);
    assert_eq!(gw.update(&address, &seven, Filter::all()).await?, 1);
    assert_eq!(gw.item(&address).await?.expect("stored").quantity, 7);

    let negative = ItemValues::new().quantity(-1);
    let err = gw.update(&address, &negative, Filter::all()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));
    assert_eq!(gw.item(&address).await?.expect("stored").quantity, 7);

    assert_eq!(gw.delete(&address, Filter::all()).await?, 1);
    let rows = gw
        .query(&address, &Projection::All, Filter::all(), None)
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn collection_delete_returns_prior_count() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    fixture
        .stock(&[("Nut", 0.1, 300), ("Bolt", 0.25, 40), ("Washer", 0.05, 0)])
        .await;
    let gw = &fixture.gateway;

    assert_eq!(gw.delete(&gw.collection(), Filter::all()).await?, 3);
    let rows = gw
        .query(&gw.collection(), &Projection::All, Filter::all(), None)
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn numeric_text_is_stored_as_numbers() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;

    let mut values = ItemValues::new().name("Spring");
    values.put(Column::Cost, "3.75").put(Column::Quantity, "12");
    let address = gw.insert(&gw.collection(), &values).await?;

    let rows = gw
        .query(
            &address,
            &Projection::from(vec![Column::Cost, Column::Quantity]),
            Filter::all(),
            None,
        )
        .await?;
    assert_eq!(rows[0].get(Column::Cost), Some(&Value::Real(3.75)));
    assert_eq!(rows[0].get(Column::Quantity), Some(&Value::Integer(12)));
    Ok(())
}

#[tokio::test]
async fn filtered_and_ordered_collection_query() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    fixture
        .stock(&[("Nut", 0.1, 300), ("Bolt", 0.25, 40), ("Washer", 0.05, 0)])
        .await;
    let gw = &fixture.gateway;

    let rows = gw
        .query(
            &gw.collection(),
            &Projection::from(vec![Column::Name]),
            Filter::all().and(Column::Quantity, Op::Gt, 0i64),
            Some(SortOrder::asc(Column::Name)),
        )
        .await?;
    let names: Vec<_> = rows
        .iter()
        .filter_map(|r| r.get(Column::Name).and_then(Value::as_text))
        .collect();
    assert_eq!(names, vec!["Bolt", "Nut"]);

    let items = gw.items().await?;
    let ids: Vec<_> = items.iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn image_survives_the_store() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;

    let values = widget().image(sample_png());
    let address = gw.insert(&gw.collection(), &values).await?;

    let item = gw.item(&address).await?.expect("stored");
    let bytes = item.image.expect("image stored");
    assert_eq!(decode_png(&bytes)?, sample_raster());

    let cleared = gw
        .update(&address, &ItemValues::new().null(Column::Image), Filter::all())
        .await?;
    assert_eq!(cleared, 1);
    assert_eq!(gw.item(&address).await?.expect("stored").image, None);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_row_changes_nothing() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;
    let address = gw.insert(&gw.collection(), &widget()).await?;
    gw.delete(&address, Filter::all()).await?;

    let updated = gw
        .update(&address, &ItemValues::new().quantity(1), Filter::all())
        .await?;
    assert_eq!(updated, 0);

    // Deleted ids are never handed out again.
    let next = gw.insert(&gw.collection(), &widget()).await?;
    assert_eq!(next.to_string(), "content://com.example.stockroom/items/2");
    Ok(())
}

#[tokio::test]
async fn invalid_update_leaves_row_alone() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;
    let address = gw.insert(&gw.collection(), &widget()).await?;

    let err = gw
        .update(
            &address,
            &ItemValues::new().quantity(5).cost(-1.0),
            Filter::all(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));
    assert_eq!(gw.item(&address).await?.expect("stored").quantity, 10);
    Ok(())
}

#[tokio::test]
async fn observers_in_other_tasks_are_woken() -> anyhow::Result<()> {
    let fixture = TestFixture::sqlite();
    let gw = Arc::new(fixture.gateway);

    let mut list = gw.subscribe(&gw.collection(), true);
    let watcher = tokio::spawn(async move { list.changed().await });

    let address = gw.insert(&gw.collection(), &widget()).await?;
    let event = tokio::time::timeout(Duration::from_secs(5), watcher)
        .await??
        .expect("notifier alive");
    assert_eq!(event.address, gw.collection());

    let mut one = gw.subscribe(&address, false);
    gw.sell_one(&address).await?;
    assert_eq!(one.try_changed().expect("sale published").address, address);

    gw.delete_all().await?;
    assert_eq!(
        one.try_changed().expect("clear published").address,
        gw.collection()
    );
    Ok(())
}

#[tokio::test]
async fn database_persists_across_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = StockroomConfig {
        database: dir.path().join("inventory.db"),
        ..StockroomConfig::default()
    };

    {
        let gw = Gateway::open(config.clone())?;
        gw.insert(&gw.collection(), &widget()).await?;
    }

    let gw = Gateway::open(config)?;
    let items = gw.items().await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Widget");
    Ok(())
}

#[tokio::test]
async fn failed_insert_returns_no_address_and_notifies_nobody() {
    let gw = Gateway::with_defaults(FullDisk);
    let mut list = gw.subscribe(&gw.collection(), true);

    let err = gw.insert(&gw.collection(), &widget()).await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Store(StoreError::InvalidData(_))
    ));
    assert!(list.try_changed().is_none());
}

#[tokio::test]
async fn foreign_authority_is_unknown() {
    let fixture = TestFixture::sqlite();
    let gw = &fixture.gateway;
    let foreign = stockroom::ResourceAddress::parse("content://org.other/items").unwrap();

    let err = gw.insert(&foreign, &widget()).await.unwrap_err();
    assert!(matches!(err, GatewayError::UnknownResource(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rejected_inserts_never_reach_the_table(values in invalid_item_values()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let fixture = TestFixture::new();
            let gw = &fixture.gateway;
            gw.insert(&gw.collection(), &widget()).await.unwrap();

            let result = gw.insert(&gw.collection(), &values).await;
            prop_assert!(matches!(result, Err(GatewayError::Validation(_))));
            prop_assert_eq!(gw.store().count(&Filter::all()).await.unwrap(), 1);
            Ok(())
        })?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn inserted_rows_read_back_exactly(params in any::<ItemParams>()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let fixture = TestFixture::sqlite();
            let gw = &fixture.gateway;

            let address = gw.insert(&gw.collection(), &params.to_values()).await.unwrap();
            let rows = gw
                .query(&address, &Projection::All, Filter::all(), None)
                .await
                .unwrap();
            prop_assert_eq!(rows.len(), 1);

            let item = gw.item(&address).await.unwrap().unwrap();
            prop_assert_eq!(gw.item_address(item.id), address);
            prop_assert_eq!(&item.name, &params.name);
            prop_assert_eq!(item.cost, params.cost);
            prop_assert_eq!(item.quantity, params.quantity.unwrap_or(0));
            prop_assert_eq!(item.image, None);
            Ok(())
        })?;
    }
}
