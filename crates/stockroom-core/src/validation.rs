//! Item validation: field-level rules applied before any write.
//!
//! Both entry points turn a raw [`ItemValues`] change-set into a typed payload
//! in canonical storage types: cost as a real, quantity as an integer. Numeric
//! text is accepted and normalized here so the store never sees text in a
//! numeric column.

use bytes::Bytes;

use crate::error::ValidationError;
use crate::types::{Column, ItemChanges, ItemValues, NewItem, Value};

/// Validate a change-set for insertion.
///
/// - name: present, non-null, not blank
/// - cost: present, non-null, numeric, `>= 0`
/// - quantity: optional (defaults to 0), integral, `>= 0`
/// - image: optional blob
/// - id: must not be supplied
pub fn validate_insert(values: &ItemValues) -> Result<NewItem, ValidationError> {
    if values.contains(Column::Id) {
        return Err(ValidationError::ImmutableId);
    }

    let name = match values.get(Column::Name) {
        Some(v) => name_value(v)?,
        None => return Err(ValidationError::NameRequired),
    };
    let cost = match values.get(Column::Cost) {
        Some(v) => cost_value(v)?,
        None => return Err(ValidationError::CostRequired),
    };
    let quantity = match values.get(Column::Quantity) {
        Some(v) => quantity_value(v)?,
        None => 0,
    };
    let image = match values.get(Column::Image) {
        Some(v) => image_value(v)?,
        None => None,
    };

    Ok(NewItem {
        name,
        cost,
        quantity,
        image,
    })
}

/// Validate a change-set for update.
///
/// Every column present in `values` is checked with the insert rule for that
/// column, whether or not the row already has a value. Absent columns are left
/// alone. An empty change-set validates to an empty [`ItemChanges`].
pub fn validate_update(values: &ItemValues) -> Result<ItemChanges, ValidationError> {
    let mut changes = ItemChanges::default();

    for (column, value) in values.iter() {
        match column {
            Column::Id => return Err(ValidationError::ImmutableId),
            Column::Name => changes.name = Some(name_value(value)?),
            Column::Cost => changes.cost = Some(cost_value(value)?),
            Column::Quantity => changes.quantity = Some(quantity_value(value)?),
            Column::Image => changes.image = Some(image_value(value)?),
        }
    }

    Ok(changes)
}

fn name_value(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::NameRequired),
        Value::Text(s) if s.trim().is_empty() => Err(ValidationError::NameRequired),
        Value::Text(s) => Ok(s.clone()),
        other => Err(ValidationError::InvalidType {
            column: Column::Name,
            expected: "text",
            found: other.type_name(),
        }),
    }
}

fn cost_value(value: &Value) -> Result<f64, ValidationError> {
    if value.is_null() {
        return Err(ValidationError::CostRequired);
    }
    let cost = value
        .as_real()
        .ok_or_else(|| invalid_number(Column::Cost, value))?;
    if cost < 0.0 {
        return Err(ValidationError::NegativeCost(cost));
    }
    Ok(cost)
}

fn quantity_value(value: &Value) -> Result<i64, ValidationError> {
    if value.is_null() {
        return Err(ValidationError::QuantityRequired);
    }
    let quantity = value
        .as_integer()
        .ok_or_else(|| invalid_number(Column::Quantity, value))?;
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }
    Ok(quantity)
}

fn image_value(value: &Value) -> Result<Option<Bytes>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Blob(b) => Ok(Some(b.clone())),
        other => Err(ValidationError::InvalidType {
            column: Column::Image,
            expected: "blob",
            found: other.type_name(),
        }),
    }
}

fn invalid_number(column: Column, value: &Value) -> ValidationError {
    let value = match value {
        Value::Text(s) => format!("{:?}", s),
        other => other.type_name().to_owned(),
    };
    ValidationError::InvalidNumber { column, value }
}
