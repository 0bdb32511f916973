//! Strong type definitions for Stockroom.
//!
//! Identifiers are newtypes to prevent misuse at compile time. Raw cells travel
//! as [`Value`]s keyed by [`Column`], the way rows come back from the engine.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Store-assigned identity of an item row.
///
/// Monotonic within a store instance and never reused after deletion.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wrap a raw row id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw row id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Columns of the `items` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Id,
    Name,
    Cost,
    Quantity,
    Image,
}

impl Column {
    /// Every column, in schema order.
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Name,
        Column::Cost,
        Column::Quantity,
        Column::Image,
    ];

    /// SQL column name.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Cost => "cost",
            Column::Quantity => "quantity",
            Column::Image => "image",
        }
    }

    /// Look a column up by its SQL name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Convert a comparison operand the way the engine's column affinity
    /// does before comparing it with a stored cell.
    ///
    /// Numeric columns turn numeric text into a number; the name column turns
    /// numbers into text. Anything else is returned unchanged.
    pub fn coerce(self, value: &Value) -> Value {
        match (self, value) {
            (Column::Id | Column::Quantity, Value::Text(_)) => match value.as_integer() {
                Some(i) => Value::Integer(i),
                None => value.as_real().map_or_else(|| value.clone(), Value::Real),
            },
            (Column::Cost, Value::Text(_)) => {
                value.as_real().map_or_else(|| value.clone(), Value::Real)
            }
            (Column::Name, Value::Integer(i)) => Value::Text(i.to_string()),
            (Column::Name, Value::Real(r)) => Value::Text(format!("{:?}", r)),
            _ => value.clone(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed cell, mirroring the engine's storage classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Bytes),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the storage class, for error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }

    /// Interpret as a finite real number. Numeric text is parsed.
    pub fn as_real(&self) -> Option<f64> {
        let v = match self {
            Value::Integer(i) => *i as f64,
            Value::Real(r) => *r,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Null | Value::Blob(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Interpret as an integer. Integral reals and integer text are accepted.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) => {
                let in_range = *r >= i64::MIN as f64 && *r < i64::MAX as f64;
                (r.is_finite() && r.fract() == 0.0 && in_range).then_some(*r as i64)
            }
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            Value::Null | Value::Blob(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Rank of the storage class in the engine's cross-type ordering.
    fn class_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Integer(_) | Value::Real(_) => 1,
            Value::Text(_) => 2,
            Value::Blob(_) => 3,
        }
    }

    /// Total order matching SQLite: NULL < numbers < text < blobs.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => {
                let a = self.as_real().unwrap_or(0.0);
                let b = other.as_real().unwrap_or(0.0);
                a.total_cmp(&b)
            }
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Blob(a), Value::Blob(b)) => a.cmp(b),
            _ => self.class_rank().cmp(&other.class_rank()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Blob(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(Bytes::from(v))
    }
}

impl From<ItemId> for Value {
    fn from(v: ItemId) -> Self {
        Value::Integer(v.get())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A change-set: the columns a caller wants written, with their raw values.
///
/// Presence of a key is meaningful even when its value is [`Value::Null`]:
/// a present null is validated (and rejected for required columns), an absent
/// key leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemValues {
    values: BTreeMap<Column, Value>,
}

impl ItemValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.put(Column::Name, Value::Text(name.into()));
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.put(Column::Cost, Value::Real(cost));
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.put(Column::Quantity, Value::Integer(quantity));
        self
    }

    pub fn image(mut self, image: impl Into<Bytes>) -> Self {
        self.put(Column::Image, Value::Blob(image.into()));
        self
    }

    /// Mark a column as present with no value.
    pub fn null(mut self, column: Column) -> Self {
        self.put(column, Value::Null);
        self
    }

    /// Set a raw value, replacing any previous one for the column.
    pub fn put(&mut self, column: Column, value: impl Into<Value>) -> &mut Self {
        self.values.insert(column, value.into());
        self
    }

    pub fn remove(&mut self, column: Column) -> Option<Value> {
        self.values.remove(&column)
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values.get(&column)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.values.contains_key(&column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.values.iter().map(|(c, v)| (*c, v))
    }
}

/// One row returned by a query: the projected cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: BTreeMap<Column, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: Column, value: Value) {
        self.cells.insert(column, value);
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.cells.get(&column)
    }

    /// The row id, if the id column was projected.
    pub fn id(&self) -> Option<ItemId> {
        match self.cells.get(&Column::Id) {
            Some(Value::Integer(raw)) => Some(ItemId::new(*raw)),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Keep only the given columns.
    pub fn project(mut self, columns: &[Column]) -> Self {
        self.cells.retain(|c, _| columns.contains(c));
        self
    }

    fn require(&self, column: Column) -> Result<&Value, CoreError> {
        self.cells.get(&column).ok_or(CoreError::MissingColumn(column))
    }
}

/// A fully materialized item row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub cost: f64,
    pub quantity: i64,
    pub image: Option<Bytes>,
}

impl Item {
    /// Build the row a store holds after inserting `new` under `id`.
    pub fn from_new(id: ItemId, new: &NewItem) -> Self {
        Self {
            id,
            name: new.name.clone(),
            cost: new.cost,
            quantity: new.quantity,
            image: new.image.clone(),
        }
    }

    /// Apply validated changes in place.
    pub fn apply(&mut self, changes: &ItemChanges) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(cost) = changes.cost {
            self.cost = cost;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(image) = &changes.image {
            self.image.clone_from(image);
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(Column::Id, Value::from(self.id));
        record.insert(Column::Name, Value::Text(self.name.clone()));
        record.insert(Column::Cost, Value::Real(self.cost));
        record.insert(Column::Quantity, Value::Integer(self.quantity));
        record.insert(Column::Image, Value::from(self.image.clone()));
        record
    }
}

impl TryFrom<&Record> for Item {
    type Error = CoreError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let mismatch = |column, expected, v: &Value| CoreError::ColumnType {
            column,
            expected,
            found: v.type_name(),
        };

        let id = match record.require(Column::Id)? {
            Value::Integer(raw) => ItemId::new(*raw),
            v => return Err(mismatch(Column::Id, "integer", v)),
        };
        let name = match record.require(Column::Name)? {
            Value::Text(s) => s.clone(),
            v => return Err(mismatch(Column::Name, "text", v)),
        };
        let cost = record.require(Column::Cost)?;
        let cost = match cost {
            Value::Integer(_) | Value::Real(_) => cost.as_real().unwrap_or_default(),
            v => return Err(mismatch(Column::Cost, "real", v)),
        };
        let quantity = match record.require(Column::Quantity)? {
            Value::Integer(q) => *q,
            v => return Err(mismatch(Column::Quantity, "integer", v)),
        };
        let image = match record.get(Column::Image) {
            None | Some(Value::Null) => None,
            Some(Value::Blob(b)) => Some(b.clone()),
            Some(v) => return Err(mismatch(Column::Image, "blob", v)),
        };

        Ok(Self {
            id,
            name,
            cost,
            quantity,
            image,
        })
    }
}

/// A validated insert payload in canonical types.
///
/// Only produced by [`crate::validate_insert`], so every instance satisfies the
/// item invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub(crate) name: String,
    pub(crate) cost: f64,
    pub(crate) quantity: i64,
    pub(crate) image: Option<Bytes>,
}

impl NewItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn image(&self) -> Option<&Bytes> {
        self.image.as_ref()
    }
}

/// A validated update payload in canonical types.
///
/// `None` means "leave the column untouched". For the image, `Some(None)`
/// clears the stored blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub(crate) name: Option<String>,
    pub(crate) cost: Option<f64>,
    pub(crate) quantity: Option<i64>,
    pub(crate) image: Option<Option<Bytes>>,
}

impl ItemChanges {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    pub fn image(&self) -> Option<Option<&Bytes>> {
        self.image.as_ref().map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cost.is_none() && self.quantity.is_none() && self.image.is_none()
    }

    /// Column assignments in schema order, as canonical values.
    pub fn assignments(&self) -> Vec<(Column, Value)> {
        let mut out = Vec::with_capacity(4);
        if let Some(name) = &self.name {
            out.push((Column::Name, Value::Text(name.clone())));
        }
        if let Some(cost) = self.cost {
            out.push((Column::Cost, Value::Real(cost)));
        }
        if let Some(quantity) = self.quantity {
            out.push((Column::Quantity, Value::Integer(quantity)));
        }
        if let Some(image) = &self.image {
            out.push((Column::Image, Value::from(image.clone())));
        }
        out
    }
}
