// File: src/constraints.rs
// Purpose: Declared per-field and object constraints, selected by group

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::error::{EngineError, Result};
use crate::errors::{ErrorBag, ViolationKind};
use crate::target::Target;
use crate::value::Value;

/// Operation a set of constraints is selected for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintGroup {
    Create,
    Update,
}

impl ConstraintGroup {
    pub const ALL: &'static [ConstraintGroup] = &[ConstraintGroup::Create, ConstraintGroup::Update];
}

impl fmt::Display for ConstraintGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintGroup::Create => write!(f, "create"),
            ConstraintGroup::Update => write!(f, "update"),
        }
    }
}

impl FromStr for ConstraintGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" | "save" => Ok(ConstraintGroup::Create),
            "update" | "edit" => Ok(ConstraintGroup::Update),
            other => Err(format!("unknown constraint group '{}'", other)),
        }
    }
}

/// Value-level check applied to a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Value must be present
    NotNull,
    /// Text must be present and contain a non-whitespace character
    NotBlank,
    /// Integer within `min..=max`; absent values pass
    Range { min: i64, max: i64 },
    /// Integer at most `max`; absent values pass
    Max(i64),
    /// Integer at least `min`; absent values pass
    Min(i64),
}

impl FieldCheck {
    /// Default violation code
    pub fn code(&self) -> &'static str {
        match self {
            FieldCheck::NotNull | FieldCheck::NotBlank => "required",
            FieldCheck::Range { .. } => "range",
            FieldCheck::Max(_) => "max",
            FieldCheck::Min(_) => "min",
        }
    }

    /// Kind of violation reported, whatever code the rule uses
    pub fn kind(&self) -> ViolationKind {
        match self {
            FieldCheck::NotNull | FieldCheck::NotBlank => ViolationKind::MissingRequired,
            FieldCheck::Range { .. } => ViolationKind::OutOfRange,
            FieldCheck::Max(_) => ViolationKind::TooLarge,
            FieldCheck::Min(_) => ViolationKind::TooSmall,
        }
    }

    /// Message arguments when `value` violates the check, `None` when it passes
    pub fn violated_by(&self, value: &Value) -> Option<Vec<Value>> {
        match *self {
            FieldCheck::NotNull => value.is_null().then(Vec::new),
            FieldCheck::NotBlank => value.is_blank().then(Vec::new),
            FieldCheck::Range { min, max } => value
                .as_integer()
                .filter(|n| *n < min || *n > max)
                .map(|_| vec![min.into(), max.into()]),
            FieldCheck::Max(max) => value
                .as_integer()
                .filter(|n| *n > max)
                .map(|_| vec![max.into()]),
            FieldCheck::Min(min) => value
                .as_integer()
                .filter(|n| *n < min)
                .map(|_| vec![min.into()]),
        }
    }
}

/// Object-level test: returns the message arguments when the target fails
pub type ObjectTest<T> = dyn Fn(&T) -> Option<Vec<Value>> + Send + Sync;

enum Scope<T> {
    Field { name: String, check: FieldCheck },
    Object { test: Box<ObjectTest<T>> },
}

/// One declared rule: what to check, which code to report, and the groups
/// it is active for.
pub struct Constraint<T> {
    scope: Scope<T>,
    code: String,
    groups: Vec<ConstraintGroup>,
    default_message: Option<String>,
}

impl<T> Constraint<T> {
    /// Field rule with the check's default code, active in every group
    pub fn field(name: impl Into<String>, check: FieldCheck) -> Self {
        Self {
            code: check.code().to_string(),
            scope: Scope::Field {
                name: name.into(),
                check,
            },
            groups: ConstraintGroup::ALL.to_vec(),
            default_message: None,
        }
    }

    pub fn not_null(name: impl Into<String>) -> Self {
        Self::field(name, FieldCheck::NotNull)
    }

    pub fn not_blank(name: impl Into<String>) -> Self {
        Self::field(name, FieldCheck::NotBlank)
    }

    pub fn range(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::field(name, FieldCheck::Range { min, max })
    }

    pub fn max(name: impl Into<String>, max: i64) -> Self {
        Self::field(name, FieldCheck::Max(max))
    }

    pub fn min(name: impl Into<String>, min: i64) -> Self {
        Self::field(name, FieldCheck::Min(min))
    }

    /// Object rule reported under `code`
    pub fn object<F>(code: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> Option<Vec<Value>> + Send + Sync + 'static,
    {
        Self {
            scope: Scope::Object {
                test: Box::new(test),
            },
            code: code.into(),
            groups: ConstraintGroup::ALL.to_vec(),
            default_message: None,
        }
    }

    /// Restrict the rule to `groups`
    pub fn groups(mut self, groups: &[ConstraintGroup]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    /// Report under `code` instead of the check's default
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Fallback message used when no message key resolves
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    pub fn field_name(&self) -> Option<&str> {
        match &self.scope {
            Scope::Field { name, .. } => Some(name),
            Scope::Object { .. } => None,
        }
    }

    pub fn violation_code(&self) -> &str {
        &self.code
    }

    pub fn is_active(&self, group: ConstraintGroup) -> bool {
        self.groups.contains(&group)
    }

    fn check_declaration(&self) -> Result<()> {
        let label = || self.field_name().unwrap_or("<object>").to_string();
        if self.code.is_empty() {
            return Err(EngineError::InvalidRule {
                field: label(),
                reason: "empty violation code".to_string(),
            });
        }
        if self.groups.is_empty() {
            return Err(EngineError::InvalidRule {
                field: label(),
                reason: "no constraint group".to_string(),
            });
        }
        if let Scope::Field {
            check: FieldCheck::Range { min, max },
            ..
        } = &self.scope
        {
            if min > max {
                return Err(EngineError::InvalidRule {
                    field: label(),
                    reason: format!("range min {} exceeds max {}", min, max),
                });
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Constraint");
        match &self.scope {
            Scope::Field { name, check } => s.field("field", name).field("check", check),
            Scope::Object { .. } => s.field("field", &"<object>"),
        };
        s.field("code", &self.code)
            .field("groups", &self.groups)
            .finish()
    }
}

/// Declared constraints for one target type, evaluated in declaration order.
///
/// Holds only immutable declarations, so one set can be shared by any
/// number of concurrent validation calls.
pub struct ConstraintSet<T> {
    constraints: Vec<Constraint<T>>,
}

impl<T> ConstraintSet<T> {
    /// Build a set, rejecting contradictory declarations
    pub fn new(constraints: Vec<Constraint<T>>) -> Result<Self> {
        for constraint in &constraints {
            constraint.check_declaration()?;
        }
        Ok(Self { constraints })
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraints active for `group`, in declaration order
    pub fn active(&self, group: ConstraintGroup) -> impl Iterator<Item = &Constraint<T>> + '_ {
        self.constraints.iter().filter(move |c| c.is_active(group))
    }
}

impl<T: Target> ConstraintSet<T> {
    /// Run every constraint active for `group` against `target`.
    ///
    /// Nothing short-circuits: each violated rule adds its own error. Field
    /// rules are skipped for fields whose input already failed to bind.
    pub fn evaluate(&self, target: &T, group: ConstraintGroup, errors: &mut ErrorBag) -> Result<()> {
        for constraint in self.active(group) {
            match &constraint.scope {
                Scope::Field { name, check } => {
                    if errors.has_binding_failure(name) {
                        trace!(field = %name, "skipping rule, field failed to bind");
                        continue;
                    }
                    let value = target.field_value(name).ok_or_else(|| EngineError::UnknownField {
                        object_name: errors.object_name().to_string(),
                        field: name.clone(),
                    })?;
                    let Some(arguments) = check.violated_by(&value) else {
                        trace!(field = %name, code = %constraint.code, "rule passed");
                        continue;
                    };
                    trace!(field = %name, code = %constraint.code, "rule violated");
                    errors.reject_value(
                        target,
                        name,
                        &constraint.code,
                        check.kind(),
                        arguments,
                        constraint.default_message.as_deref(),
                    )?;
                }
                Scope::Object { test } => {
                    if let Some(arguments) = test(target) {
                        trace!(code = %constraint.code, "object rule violated");
                        errors.reject(
                            &constraint.code,
                            arguments,
                            constraint.default_message.as_deref(),
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for ConstraintSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.constraints).finish()
    }
}

/// Type-erased view of a [`ConstraintSet`], used by the dispatcher
pub trait GroupedConstraints: Send + Sync {
    fn supports(&self, target: &dyn Target) -> bool;

    fn evaluate_target(
        &self,
        target: &dyn Target,
        group: ConstraintGroup,
        errors: &mut ErrorBag,
    ) -> Result<()>;
}

impl<T: Target> GroupedConstraints for ConstraintSet<T> {
    fn supports(&self, target: &dyn Target) -> bool {
        target.as_any().is::<T>()
    }

    fn evaluate_target(
        &self,
        target: &dyn Target,
        group: ConstraintGroup,
        errors: &mut ErrorBag,
    ) -> Result<()> {
        let target = target
            .as_any()
            .downcast_ref::<T>()
            .ok_or(EngineError::UnsupportedTarget {
                type_name: target.type_name(),
            })?;
        self.evaluate(target, group, errors)
    }
}
