// File: src/validator.rs
// Purpose: Validator trait and the hand-written item validator

use crate::error::{EngineError, Result};
use crate::errors::{ErrorBag, ViolationKind};
use crate::item::{fields, Item, ItemBounds, TOTAL_PRICE_MIN};
use crate::target::Target;

/// Custom validation logic for one or more target types.
///
/// The dispatcher asks every registered validator whether it supports the
/// target; each one that does runs against the shared [`ErrorBag`].
pub trait Validator: Send + Sync {
    /// Label used in logs
    fn name(&self) -> &str;

    fn supports(&self, target: &dyn Target) -> bool;

    /// Add any violations found to `errors`. Only hard failures are `Err`.
    fn validate(&self, target: &dyn Target, errors: &mut ErrorBag) -> Result<()>;
}

/// Item rules written out by hand instead of declared as constraints.
///
/// Ignores constraint groups. A missing price or quantity is reported with
/// the range/max code rather than `required`.
#[derive(Debug, Clone, Default)]
pub struct ItemValidator {
    bounds: ItemBounds,
}

impl ItemValidator {
    pub fn new(bounds: ItemBounds) -> Self {
        Self { bounds }
    }
}

impl Validator for ItemValidator {
    fn name(&self) -> &str {
        "ItemValidator"
    }

    fn supports(&self, target: &dyn Target) -> bool {
        target.as_any().is::<Item>()
    }

    fn validate(&self, target: &dyn Target, errors: &mut ErrorBag) -> Result<()> {
        let item = target
            .as_any()
            .downcast_ref::<Item>()
            .ok_or(EngineError::UnsupportedTarget {
                type_name: target.type_name(),
            })?;
        let b = &self.bounds;

        let name_blank = item
            .item_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty());
        if name_blank && !errors.has_binding_failure(fields::ITEM_NAME) {
            errors.reject_value(
                item,
                fields::ITEM_NAME,
                "required",
                ViolationKind::MissingRequired,
                Vec::new(),
                None,
            )?;
        }

        let price_ok = item
            .price
            .is_some_and(|p| (b.price_min..=b.price_max).contains(&(p as i64)));
        if !price_ok && !errors.has_binding_failure(fields::PRICE) {
            errors.reject_value(
                item,
                fields::PRICE,
                "range",
                ViolationKind::OutOfRange,
                vec![b.price_min.into(), b.price_max.into()],
                None,
            )?;
        }

        let quantity_ok = item.quantity.is_some_and(|q| (q as i64) <= b.quantity_max);
        if !quantity_ok && !errors.has_binding_failure(fields::QUANTITY) {
            errors.reject_value(
                item,
                fields::QUANTITY,
                "max",
                ViolationKind::TooLarge,
                vec![b.quantity_max.into()],
                None,
            )?;
        }

        if let Some(total) = item.total_price() {
            if total < b.total_price_min {
                errors.reject(
                    TOTAL_PRICE_MIN,
                    vec![b.total_price_min.into(), total.into()],
                    None,
                )?;
            }
        }

        Ok(())
    }
}
