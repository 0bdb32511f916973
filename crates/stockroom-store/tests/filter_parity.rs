//! The memory store must select exactly the rows SQLite selects.

use proptest::prelude::*;
use stockroom_core::{validate_insert, Column, Filter, ItemValues, Op, Projection, SortOrder, Value};
use stockroom_store::{MemoryStore, SqliteStore, Store};

const ROWS: &[(&str, f64, i64)] = &[
    ("Nut", 0.1, 300),
    ("Bolt", 0.25, 40),
    ("Washer", 0.05, 0),
    ("42", 12.5, 5),
    ("bolt", 2.0, 40),
];

async fn stocked<S: Store>(store: S) -> S {
    for (name, cost, quantity) in ROWS {
        let values = ItemValues::new().name(*name).cost(*cost).quantity(*quantity);
        store
            .insert(&validate_insert(&values).unwrap())
            .await
            .unwrap();
    }
    store
}

async fn matching_ids<S: Store>(store: &S, filter: &Filter) -> Vec<i64> {
    store
        .select(
            &Projection::from(vec![Column::Id]),
            filter,
            Some(SortOrder::asc(Column::Id)),
        )
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.get(Column::Id).and_then(Value::as_integer))
        .collect()
}

fn column() -> impl Strategy<Value = Column> {
    prop_oneof![
        Just(Column::Id),
        Just(Column::Name),
        Just(Column::Cost),
        Just(Column::Quantity),
    ]
}

fn comparison() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Eq),
        Just(Op::Ne),
        Just(Op::Lt),
        Just(Op::Le),
        Just(Op::Gt),
        Just(Op::Ge),
    ]
}

fn operand() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-5i64..=400).prop_map(Value::Integer),
        (0u32..=50_000).prop_map(|cents| Value::Real(f64::from(cents) / 100.0)),
        (-5i64..=400).prop_map(|i| Value::Text(i.to_string())),
        (0u32..=50_000).prop_map(|cents| Value::Text(format!("{}.{:02}", cents / 100, cents % 100))),
        prop::sample::select(vec!["Bolt", "bolt", "Nut", "Washer", "42", "ten", ""])
            .prop_map(|s| Value::Text(s.to_owned())),
    ]
}

fn like_pattern() -> impl Strategy<Value = Value> {
    prop::sample::select(vec!["%o%", "b%", "B_LT", "_ut", "%5", "4%", "%%", "0.%", "x%"])
        .prop_map(|s| Value::Text(s.to_owned()))
}

fn condition() -> impl Strategy<Value = (Column, Op, Value)> {
    prop_oneof![
        (column(), comparison(), operand()),
        (column(), Just(Op::Like), like_pattern()),
    ]
}

#[tokio::test]
async fn numeric_text_filters_agree() {
    let sqlite = stocked(SqliteStore::open_memory().unwrap()).await;
    let memory = stocked(MemoryStore::new()).await;

    let filter = Filter::all().eq(Column::Quantity, "40");
    let expected = matching_ids(&sqlite, &filter).await;
    assert_eq!(expected, vec![2, 5]);
    assert_eq!(matching_ids(&memory, &filter).await, expected);

    let filter = Filter::all().and(Column::Cost, Op::Lt, "0.2");
    assert_eq!(
        matching_ids(&memory, &filter).await,
        matching_ids(&sqlite, &filter).await
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn filters_select_the_same_rows(conditions in prop::collection::vec(condition(), 1..=2)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let sqlite = stocked(SqliteStore::open_memory().unwrap()).await;
            let memory = stocked(MemoryStore::new()).await;

            let filter = conditions
                .iter()
                .cloned()
                .fold(Filter::all(), |f, (column, op, value)| f.and(column, op, value));

            let expected = matching_ids(&sqlite, &filter).await;
            prop_assert_eq!(matching_ids(&memory, &filter).await, expected, "{:?}", filter);
            Ok(())
        })?;
    }
}
