// File: src/target.rs
// Purpose: Read-only view of an entity under validation

use std::any::Any;
use std::fmt;

use crate::value::Value;

/// Declared type of a target field.
///
/// The canonical name feeds the `code.type` message key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Bool,
    Int32,
    Int64,
}

impl FieldType {
    pub fn canonical_name(self) -> &'static str {
        match self {
            FieldType::Text => "String",
            FieldType::Bool => "bool",
            FieldType::Int32 => "i32",
            FieldType::Int64 => "i64",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// An entity the engine can validate.
///
/// Field access is by name so constraint declarations stay plain data.
pub trait Target: Any + Send + Sync + fmt::Debug {
    /// Name violations are scoped to (`item`)
    fn object_name(&self) -> &str;

    /// Declared field names, in form order
    fn field_names(&self) -> &'static [&'static str];

    /// Current value of `field`; `None` when the field does not exist
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Declared type of `field`; `None` when the field does not exist
    fn field_type(&self, field: &str) -> Option<FieldType>;

    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
