// File: src/item.rs
// Purpose: The item entity submitted through the add/edit forms

use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::constraints::{Constraint, ConstraintGroup, ConstraintSet};
use crate::error::Result;
use crate::target::{FieldType, Target};
use crate::value::Value;

/// Object name item violations are reported under
pub const OBJECT_NAME: &str = "item";

/// Form field names
pub mod fields {
    pub const ID: &str = "id";
    pub const ITEM_NAME: &str = "itemName";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";

    pub const ALL: &[&str] = &[ID, ITEM_NAME, PRICE, QUANTITY];
}

/// Item as submitted. Every attribute may be absent until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Required only when updating
    pub id: Option<i64>,
    pub item_name: Option<String>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl Item {
    pub fn new(item_name: impl Into<String>, price: i32, quantity: i32) -> Self {
        Self {
            id: None,
            item_name: Some(item_name.into()),
            price: Some(price),
            quantity: Some(quantity),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// `price * quantity` when both are present. Widened so it cannot overflow.
    pub fn total_price(&self) -> Option<i64> {
        Some(self.price? as i64 * self.quantity? as i64)
    }
}

impl Target for Item {
    fn object_name(&self) -> &str {
        OBJECT_NAME
    }

    fn field_names(&self) -> &'static [&'static str] {
        fields::ALL
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            fields::ID => Some(self.id.into()),
            fields::ITEM_NAME => Some(self.item_name.clone().into()),
            fields::PRICE => Some(self.price.into()),
            fields::QUANTITY => Some(self.quantity.into()),
            _ => None,
        }
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        match field {
            fields::ID => Some(FieldType::Int64),
            fields::ITEM_NAME => Some(FieldType::Text),
            fields::PRICE | fields::QUANTITY => Some(FieldType::Int32),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Numeric limits behind the item rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemBounds {
    pub price_min: i64,
    pub price_max: i64,
    /// Enforced on create only
    pub quantity_max: i64,
    pub total_price_min: i64,
}

impl Default for ItemBounds {
    fn default() -> Self {
        Self {
            price_min: 1000,
            price_max: 1_000_000,
            quantity_max: 9999,
            total_price_min: 10_000,
        }
    }
}

/// Code for the `price * quantity` minimum
pub const TOTAL_PRICE_MIN: &str = "totalPriceMin";

/// Item rules:
///
/// | field    | rule                        | groups         |
/// |----------|-----------------------------|----------------|
/// | id       | present                     | update         |
/// | itemName | not blank                   | create, update |
/// | price    | present, within bounds      | create, update |
/// | quantity | present                     | create, update |
/// | quantity | at most `quantity_max`      | create         |
/// | (object) | `price * quantity >= total` | create, update |
///
/// The total rule runs whenever price and quantity are both present, even
/// when either one already broke its own rule.
pub fn item_constraints(bounds: ItemBounds) -> Result<ConstraintSet<Item>> {
    use ConstraintGroup::{Create, Update};

    let total_min = bounds.total_price_min;
    ConstraintSet::new(vec![
        Constraint::not_null(fields::ID).groups(&[Update]),
        Constraint::not_blank(fields::ITEM_NAME).groups(&[Create, Update]),
        Constraint::not_null(fields::PRICE).groups(&[Create, Update]),
        Constraint::range(fields::PRICE, bounds.price_min, bounds.price_max).groups(&[Create, Update]),
        Constraint::not_null(fields::QUANTITY).groups(&[Create, Update]),
        Constraint::max(fields::QUANTITY, bounds.quantity_max).groups(&[Create]),
        Constraint::object(TOTAL_PRICE_MIN, move |item: &Item| {
            let total = item.total_price()?;
            (total < total_min).then(|| vec![total_min.into(), total.into()])
        })
        .groups(&[Create, Update]),
    ])
}
