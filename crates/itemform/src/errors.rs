// File: src/errors.rs
// Purpose: ErrorBag - ordered container of field and object violations

use serde::Serialize;
use std::fmt;

use crate::codes::MessageCodesResolver;
use crate::error::{EngineError, Result};
use crate::target::Target;
use crate::value::Value;

/// Code recorded when raw input cannot be converted to the field's type
pub const TYPE_MISMATCH: &str = "typeMismatch";

/// What went wrong, independent of the message codes used to describe it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    MissingRequired,
    OutOfRange,
    TooLarge,
    TooSmall,
    CrossFieldInconsistency,
    BindingFailure,
    #[default]
    Other,
}

/// A violation of a rule spanning the whole object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectError {
    pub object_name: String,
    pub codes: Vec<String>,
    pub arguments: Vec<Value>,
    pub default_message: Option<String>,
}

impl ObjectError {
    pub fn new(object_name: impl Into<String>, codes: Vec<String>) -> Self {
        Self {
            object_name: object_name.into(),
            codes,
            arguments: Vec::new(),
            default_message: None,
        }
    }

    pub fn arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    pub fn kind(&self) -> ViolationKind {
        ViolationKind::CrossFieldInconsistency
    }
}

/// A violation attached to one field, with the value the user supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    /// Raw text when binding failed, otherwise the bound value
    pub rejected_value: Value,
    pub binding_failure: bool,
    pub kind: ViolationKind,
    pub codes: Vec<String>,
    pub arguments: Vec<Value>,
    pub default_message: Option<String>,
}

impl FieldError {
    pub fn new(object_name: impl Into<String>, field: impl Into<String>, codes: Vec<String>) -> Self {
        Self {
            object_name: object_name.into(),
            field: field.into(),
            rejected_value: Value::Null,
            binding_failure: false,
            kind: ViolationKind::Other,
            codes,
            arguments: Vec::new(),
            default_message: None,
        }
    }

    pub fn rejected_value(mut self, value: impl Into<Value>) -> Self {
        self.rejected_value = value.into();
        self
    }

    /// Mark the error as a conversion failure; its kind follows
    pub fn binding_failure(mut self, binding_failure: bool) -> Self {
        self.binding_failure = binding_failure;
        if binding_failure {
            self.kind = ViolationKind::BindingFailure;
        }
        self
    }

    pub fn with_kind(mut self, kind: ViolationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    pub fn kind(&self) -> ViolationKind {
        if self.binding_failure {
            return ViolationKind::BindingFailure;
        }
        self.kind
    }
}

/// Either kind of violation, in the order it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Violation {
    Object(ObjectError),
    Field(FieldError),
}

impl Violation {
    pub fn object_name(&self) -> &str {
        match self {
            Violation::Object(e) => &e.object_name,
            Violation::Field(e) => &e.object_name,
        }
    }

    /// Field name for field errors, `None` for object errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Violation::Object(_) => None,
            Violation::Field(e) => Some(&e.field),
        }
    }

    pub fn codes(&self) -> &[String] {
        match self {
            Violation::Object(e) => &e.codes,
            Violation::Field(e) => &e.codes,
        }
    }

    pub fn arguments(&self) -> &[Value] {
        match self {
            Violation::Object(e) => &e.arguments,
            Violation::Field(e) => &e.arguments,
        }
    }

    pub fn default_message(&self) -> Option<&str> {
        match self {
            Violation::Object(e) => e.default_message.as_deref(),
            Violation::Field(e) => e.default_message.as_deref(),
        }
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::Object(e) => e.kind(),
            Violation::Field(e) => e.kind(),
        }
    }
}

/// Every violation found for one validation target.
///
/// Violations are appended and never replaced or deduplicated, so a field
/// can carry several errors. A bag is built per validation call and handed
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBag {
    object_name: String,
    #[serde(skip)]
    resolver: MessageCodesResolver,
    #[serde(rename = "errors")]
    violations: Vec<Violation>,
}

impl ErrorBag {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self::with_resolver(object_name, MessageCodesResolver::default())
    }

    pub fn with_resolver(object_name: impl Into<String>, resolver: MessageCodesResolver) -> Self {
        Self {
            object_name: object_name.into(),
            resolver,
            violations: Vec::new(),
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn resolver(&self) -> &MessageCodesResolver {
        &self.resolver
    }

    pub fn add_field_error(&mut self, error: FieldError) -> Result<()> {
        self.check_object_name(&error.object_name)?;
        if error.codes.is_empty() {
            return Err(EngineError::MissingCodes {
                object_name: error.object_name,
                field: Some(error.field),
            });
        }
        self.violations.push(Violation::Field(error));
        Ok(())
    }

    pub fn add_object_error(&mut self, error: ObjectError) -> Result<()> {
        self.check_object_name(&error.object_name)?;
        if error.codes.is_empty() {
            return Err(EngineError::MissingCodes {
                object_name: error.object_name,
                field: None,
            });
        }
        self.violations.push(Violation::Object(error));
        Ok(())
    }

    fn check_object_name(&self, found: &str) -> Result<()> {
        if found != self.object_name {
            return Err(EngineError::ObjectNameMismatch {
                expected: self.object_name.clone(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Record a field error for `field`, resolving message codes from `code`
    /// and capturing the field's current value as the rejected value.
    pub fn reject_value(
        &mut self,
        target: &dyn Target,
        field: &str,
        code: &str,
        kind: ViolationKind,
        arguments: Vec<Value>,
        default_message: Option<&str>,
    ) -> Result<()> {
        let unknown = || EngineError::UnknownField {
            object_name: self.object_name.clone(),
            field: field.to_string(),
        };
        let field_type = target.field_type(field).ok_or_else(unknown)?;
        let rejected = target.field_value(field).ok_or_else(unknown)?;

        let codes = self.resolver.resolve_field_codes(
            code,
            &self.object_name,
            field,
            field_type.canonical_name(),
        );
        let mut error = FieldError::new(self.object_name.clone(), field, codes)
            .rejected_value(rejected)
            .with_kind(kind)
            .arguments(arguments);
        error.default_message = default_message.map(str::to_string);
        self.add_field_error(error)
    }

    /// Record an object error, resolving message codes from `code`
    pub fn reject(
        &mut self,
        code: &str,
        arguments: Vec<Value>,
        default_message: Option<&str>,
    ) -> Result<()> {
        let codes = self.resolver.resolve_object_codes(code, &self.object_name);
        let mut error = ObjectError::new(self.object_name.clone(), codes).arguments(arguments);
        error.default_message = default_message.map(str::to_string);
        self.add_object_error(error)
    }

    /// Append every violation of `other`, keeping its order.
    /// Both bags must belong to the same object.
    pub fn merge(&mut self, other: ErrorBag) -> Result<()> {
        self.check_object_name(&other.object_name)?;
        self.violations.extend(other.violations);
        Ok(())
    }

    pub fn has_errors(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn has_field_errors(&self) -> bool {
        self.field_errors().next().is_some()
    }

    pub fn has_errors_for(&self, field: &str) -> bool {
        self.field_errors_for(field).next().is_some()
    }

    pub fn has_global_errors(&self) -> bool {
        self.global_errors().next().is_some()
    }

    pub fn has_binding_failure(&self, field: &str) -> bool {
        self.field_errors()
            .any(|e| e.field == field && e.binding_failure)
    }

    /// All violations in insertion order. Call again to restart.
    pub fn all_errors(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> + Clone + '_ {
        self.violations.iter().filter_map(|v| match v {
            Violation::Field(e) => Some(e),
            Violation::Object(_) => None,
        })
    }

    pub fn field_errors_for<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a FieldError> + Clone + 'a {
        self.field_errors().filter(move |e| e.field == field)
    }

    /// First error recorded for `field`
    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors().find(|e| e.field == field)
    }

    pub fn global_errors(&self) -> impl Iterator<Item = &ObjectError> + Clone + '_ {
        self.violations.iter().filter_map(|v| match v {
            Violation::Object(e) => Some(e),
            Violation::Field(_) => None,
        })
    }

    /// Rejected value of the first error on `field`, for redisplay
    pub fn field_value(&self, field: &str) -> Option<&Value> {
        self.field_error(field).map(|e| &e.rejected_value)
    }

    pub fn error_count(&self) -> usize {
        self.violations.len()
    }

    pub fn field_error_count(&self) -> usize {
        self.field_errors().count()
    }

    pub fn global_error_count(&self) -> usize {
        self.global_errors().count()
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} errors for object '{}'",
            self.violations.len(),
            self.object_name
        )?;
        for violation in &self.violations {
            match violation {
                Violation::Object(e) => write!(f, "\n  object: codes {:?}", e.codes)?,
                Violation::Field(e) => write!(
                    f,
                    "\n  field '{}': rejected '{}', codes {:?}",
                    e.field,
                    e.rejected_value.to_input_string(),
                    e.codes
                )?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorBag {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.all_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_bag() {
        let bag = ErrorBag::new("item");
        assert!(!bag.has_errors());
        assert!(!bag.has_field_errors());
        assert!(!bag.has_global_errors());
        assert_eq!(bag.all_errors().count(), 0);
    }

    #[test]
    fn test_keeps_every_error_in_order() {
        let mut bag = ErrorBag::new("item");
        bag.add_field_error(FieldError::new("item", "price", codes(&["range"])).rejected_value(5))
            .unwrap();
        bag.add_object_error(ObjectError::new("item", codes(&["totalPriceMin"])))
            .unwrap();
        bag.add_field_error(FieldError::new("item", "price", codes(&["max"])).rejected_value(5))
            .unwrap();

        assert_eq!(bag.error_count(), 3);
        assert_eq!(bag.field_errors_for("price").count(), 2);
        let order: Vec<Option<&str>> = bag.all_errors().map(|v| v.field()).collect();
        assert_eq!(order, vec![Some("price"), None, Some("price")]);

        // restartable
        assert_eq!(bag.all_errors().count(), 3);
        assert_eq!((&bag).into_iter().count(), 3);
    }

    #[test]
    fn test_rejects_empty_codes() {
        let mut bag = ErrorBag::new("item");
        let err = bag
            .add_field_error(FieldError::new("item", "price", Vec::new()))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingCodes {
                object_name: "item".to_string(),
                field: Some("price".to_string()),
            }
        );
        assert!(bag
            .add_object_error(ObjectError::new("item", Vec::new()))
            .is_err());
        assert!(!bag.has_errors());
    }

    #[test]
    fn test_reject_value_resolves_codes() {
        let item = Item::new("", 500, 1);
        let mut bag = ErrorBag::new("item");
        bag.reject_value(&item, "itemName", "required", ViolationKind::MissingRequired, Vec::new(), None)
            .unwrap();
        bag.reject_value(
            &item,
            "price",
            "range",
            ViolationKind::OutOfRange,
            vec![1000.into(), 1_000_000.into()],
            None,
        )
        .unwrap();

        let name = bag.field_error("itemName").unwrap();
        assert_eq!(
            name.codes,
            codes(&["required.item.itemName", "required.itemName", "required.String", "required"])
        );
        assert_eq!(name.rejected_value, Value::from(""));
        assert_eq!(name.kind(), ViolationKind::MissingRequired);

        let price = bag.field_error("price").unwrap();
        assert_eq!(price.rejected_value, Value::Integer(500));
        assert_eq!(price.kind(), ViolationKind::OutOfRange);
        assert_eq!(bag.field_value("price"), Some(&Value::Integer(500)));
    }

    #[test]
    fn test_reject_value_unknown_field() {
        let item = Item::default();
        let mut bag = ErrorBag::new("item");
        let err = bag
            .reject_value(&item, "color", "required", ViolationKind::MissingRequired, Vec::new(), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownField { .. }));
    }

    #[test]
    fn test_reject_object() {
        let mut bag = ErrorBag::new("item");
        let recorded = bag.reject("totalPriceMin", vec![10000.into(), 100.into()], None);

        assert_eq!(recorded, Ok(()));
        assert!(bag.has_global_errors());
        assert!(!bag.has_field_errors());
        let error = bag.global_errors().next().unwrap();
        assert_eq!(error.codes, codes(&["totalPriceMin.item", "totalPriceMin"]));
        assert_eq!(error.kind(), ViolationKind::CrossFieldInconsistency);
    }

    #[test]
    fn test_binding_failure_flag() {
        let mut bag = ErrorBag::new("item");
        bag.add_field_error(
            FieldError::new("item", "price", codes(&[TYPE_MISMATCH]))
                .rejected_value("abc")
                .binding_failure(true),
        )
        .unwrap();

        assert!(bag.has_binding_failure("price"));
        assert!(!bag.has_binding_failure("quantity"));
        assert_eq!(bag.field_error("price").unwrap().kind(), ViolationKind::BindingFailure);
    }

    #[test]
    fn test_merge_appends() {
        let mut first = ErrorBag::new("item");
        first.reject("a", Vec::new(), None).unwrap();
        let mut second = ErrorBag::new("item");
        second.reject("b", Vec::new(), None).unwrap();
        second.reject("c", Vec::new(), None).unwrap();

        first.merge(second).unwrap();
        let bases: Vec<&str> = first
            .all_errors()
            .map(|v| v.codes().last().unwrap().as_str())
            .collect();
        assert_eq!(bases, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_display_summary() {
        let mut bag = ErrorBag::new("item");
        bag.reject("totalPriceMin", Vec::new(), None).unwrap();
        assert!(bag.to_string().starts_with("1 errors for object 'item'"));
    }

    #[test]
    fn test_kind_is_stored_not_derived_from_codes() {
        let item = Item::default();
        let mut bag = ErrorBag::with_resolver("item", MessageCodesResolver::new().with_prefix("err_"));
        bag.reject_value(&item, "itemName", "nameMissing", ViolationKind::MissingRequired, Vec::new(), None)
            .unwrap();

        let error = bag.field_error("itemName").unwrap();
        assert_eq!(error.codes.last().map(String::as_str), Some("err_nameMissing"));
        assert_eq!(error.kind(), ViolationKind::MissingRequired);

        let plain = FieldError::new("item", "price", codes(&["range"]));
        assert_eq!(plain.kind(), ViolationKind::Other);
    }

    #[test]
    fn test_rejects_foreign_object_name() {
        let mut bag = ErrorBag::new("item");
        let err = bag
            .add_field_error(FieldError::new("order", "price", codes(&["range"])))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::ObjectNameMismatch {
                expected: "item".to_string(),
                found: "order".to_string(),
            }
        );
        assert!(bag
            .add_object_error(ObjectError::new("order", codes(&["totalPriceMin"])))
            .is_err());
        assert_eq!(bag.error_count(), 0);
    }

    #[test]
    fn test_merge_rejects_other_object() {
        let mut item = ErrorBag::new("item");
        item.reject("a", Vec::new(), None).unwrap();
        let mut order = ErrorBag::new("order");
        order.reject("b", Vec::new(), None).unwrap();

        assert!(matches!(
            item.merge(order),
            Err(EngineError::ObjectNameMismatch { .. })
        ));
        assert_eq!(item.error_count(), 1);
    }
}
