// File: src/dispatcher.rs
// Purpose: Run constraint sets and validators for a target into one ErrorBag

use tracing::{debug, warn};

use crate::binding::Bound;
use crate::codes::MessageCodesResolver;
use crate::constraints::{ConstraintGroup, ConstraintSet, GroupedConstraints};
use crate::error::{EngineError, Result};
use crate::errors::ErrorBag;
use crate::item::{item_constraints, ItemBounds};
use crate::target::Target;
use crate::validator::Validator;

/// Entry point for callers.
///
/// Every supporting constraint set runs first, then every supporting
/// validator, all into one fresh bag. Validators are not exclusive: each one
/// that supports the target runs. Holds only immutable declarations and can
/// be shared across threads.
///
/// ```
/// use itemform::{ConstraintGroup, Item, ValidationDispatcher};
///
/// let dispatcher = ValidationDispatcher::for_items().unwrap();
/// let errors = dispatcher
///     .validate(&Item::new("pen", 100, 1), ConstraintGroup::Create)
///     .unwrap();
/// assert!(errors.has_errors_for("price"));
/// assert!(errors.has_global_errors());
/// ```
#[derive(Default)]
pub struct ValidationDispatcher {
    resolver: MessageCodesResolver,
    constraints: Vec<Box<dyn GroupedConstraints>>,
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the default item constraint set
    pub fn for_items() -> Result<Self> {
        Ok(Self::new().with_constraints(item_constraints(ItemBounds::default())?))
    }

    pub fn with_resolver(mut self, resolver: MessageCodesResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_constraints<T: Target>(mut self, set: ConstraintSet<T>) -> Self {
        self.constraints.push(Box::new(set));
        self
    }

    pub fn with_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn resolver(&self) -> &MessageCodesResolver {
        &self.resolver
    }

    /// Empty bag scoped to `target`, using this dispatcher's resolver
    pub fn new_bag(&self, target: &dyn Target) -> ErrorBag {
        ErrorBag::with_resolver(target.object_name(), self.resolver.clone())
    }

    pub fn supports(&self, target: &dyn Target) -> bool {
        self.constraints.iter().any(|c| c.supports(target))
            || self.validators.iter().any(|v| v.supports(target))
    }

    /// Validate `target` for `group` from scratch
    pub fn validate(&self, target: &dyn Target, group: ConstraintGroup) -> Result<ErrorBag> {
        let mut errors = self.new_bag(target);
        self.validate_into(target, group, &mut errors)?;
        Ok(errors)
    }

    /// Continue validation of a bound target, keeping its binding failures
    pub fn validate_bound<T: Target>(&self, bound: Bound<T>, group: ConstraintGroup) -> Result<Bound<T>> {
        let Bound { target, mut errors } = bound;
        self.validate_into(&target, group, &mut errors)?;
        Ok(Bound { target, errors })
    }

    /// Validate `target` into an existing bag
    pub fn validate_into(
        &self,
        target: &dyn Target,
        group: ConstraintGroup,
        errors: &mut ErrorBag,
    ) -> Result<()> {
        if !self.supports(target) {
            warn!(type_name = target.type_name(), "no validator for target");
            return Err(EngineError::UnsupportedTarget {
                type_name: target.type_name(),
            });
        }

        let before = errors.error_count();

        for set in self.constraints.iter().filter(|c| c.supports(target)) {
            set.evaluate_target(target, group, errors)?;
        }

        for validator in self.validators.iter().filter(|v| v.supports(target)) {
            debug!(validator = validator.name(), "running validator");
            validator.validate(target, errors)?;
        }

        debug!(
            object = errors.object_name(),
            %group,
            added = errors.error_count() - before,
            total = errors.error_count(),
            "validation finished"
        );
        Ok(())
    }
}
