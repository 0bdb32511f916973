//! Proptest generators for property-based testing.

use proptest::prelude::*;

use stockroom_core::{Column, ItemValues, PixelFormat, RasterImage, Value};

/// Generate a non-blank item name.
pub fn item_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,23}".prop_map(String::from)
}

/// Generate a non-negative cost with cent precision.
pub fn cost() -> impl Strategy<Value = f64> {
    (0u32..=1_000_000u32).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generate a stock level.
pub fn quantity() -> impl Strategy<Value = i64> {
    0i64..=10_000i64
}

/// Generate a pixel format.
pub fn pixel_format() -> impl Strategy<Value = PixelFormat> {
    prop_oneof![
        Just(PixelFormat::Gray),
        Just(PixelFormat::GrayAlpha),
        Just(PixelFormat::Rgb),
        Just(PixelFormat::Rgba),
    ]
}

/// Generate a small raster image.
pub fn raster_image() -> impl Strategy<Value = RasterImage> {
    (1u32..=16, 1u32..=16, pixel_format())
        .prop_flat_map(|(width, height, format)| {
            let len = width as usize * height as usize * format.channels();
            prop::collection::vec(any::<u8>(), len).prop_map(move |pixels| RasterImage {
                width,
                height,
                format,
                pixels,
            })
        })
}

/// Parameters for a valid item insertion.
#[derive(Debug, Clone)]
pub struct ItemParams {
    pub name: String,
    pub cost: f64,
    /// `None` leaves the quantity to its default of 0.
    pub quantity: Option<i64>,
}

impl ItemParams {
    pub fn to_values(&self) -> ItemValues {
        let values = ItemValues::new().name(self.name.clone()).cost(self.cost);
        match self.quantity {
            Some(q) => values.quantity(q),
            None => values,
        }
    }
}

impl Arbitrary for ItemParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (item_name(), cost(), proptest::option::of(quantity()))
            .prop_map(|(name, cost, quantity)| ItemParams {
                name,
                cost,
                quantity,
            })
            .boxed()
    }
}

/// Generate a change-set that passes insert validation.
pub fn valid_item_values() -> impl Strategy<Value = ItemValues> {
    any::<ItemParams>().prop_map(|p| p.to_values())
}

/// Generate a change-set that insert validation must reject.
pub fn invalid_item_values() -> impl Strategy<Value = ItemValues> {
    any::<ItemParams>().prop_flat_map(|p| {
        let base = p.to_values();
        prop_oneof![
            // name missing, null or blank
            Just(without(&base, Column::Name)),
            Just(with(&base, Column::Name, Value::Null)),
            " {0,4}".prop_map({
                let base = base.clone();
                move |blank| with(&base, Column::Name, Value::Text(blank))
            }),
            // cost missing, null or negative
            Just(without(&base, Column::Cost)),
            Just(with(&base, Column::Cost, Value::Null)),
            (1u32..=1_000_000u32).prop_map({
                let base = base.clone();
                move |cents| with(&base, Column::Cost, Value::Real(-f64::from(cents) / 100.0))
            }),
            // quantity null or negative
            Just(with(&base, Column::Quantity, Value::Null)),
            (i64::MIN..0i64).prop_map({
                let base = base.clone();
                move |q| with(&base, Column::Quantity, Value::Integer(q))
            }),
            // caller-chosen id
            Just(with(&base, Column::Id, Value::Integer(1))),
        ]
    })
}

fn with(base: &ItemValues, column: Column, value: Value) -> ItemValues {
    let mut values = base.clone();
    values.put(column, value);
    values
}

fn without(base: &ItemValues, column: Column) -> ItemValues {
    let mut values = base.clone();
    values.remove(column);
    values
}
