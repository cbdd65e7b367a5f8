// File: src/binding.rs
// Purpose: Bind raw submitted text to a typed target, recording type mismatches

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::codes::MessageCodesResolver;
use crate::error::Result;
use crate::errors::{ErrorBag, FieldError, TYPE_MISMATCH};
use crate::item::{fields, Item, OBJECT_NAME};
use crate::target::{FieldType, Target};
use crate::value::Value;

/// Raw form fields from a POST/PUT body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from form fields with automatic trimming
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect();
        Self { fields }
    }

    /// Create from `(name, value)` pairs; later pairs win
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_fields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Create from a JSON object. Non-string values keep their JSON text.
    pub fn from_json(json: &JsonValue) -> Self {
        let fields = json
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| {
                        let text = match value.as_str() {
                            Some(s) => s.trim().to_string(),
                            None => value.to_string(),
                        };
                        (key.clone(), text)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A bound target together with the bag holding its binding failures
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
    pub target: T,
    pub errors: ErrorBag,
}

impl<T> Bound<T> {
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }
}

/// Targets that can be built from raw form input
pub trait FromForm: Target + Sized {
    /// Convert every field it can. Fields whose text does not parse are left
    /// absent and recorded as binding failures in the returned bag.
    fn bind(form: &FormData, resolver: &MessageCodesResolver) -> Result<Bound<Self>>;
}

impl FromForm for Item {
    fn bind(form: &FormData, resolver: &MessageCodesResolver) -> Result<Bound<Self>> {
        let mut errors = ErrorBag::with_resolver(OBJECT_NAME, resolver.clone());

        let item = Item {
            id: bind_parsed(form, fields::ID, FieldType::Int64, &mut errors)?,
            item_name: form.get(fields::ITEM_NAME).map(str::to_string),
            price: bind_parsed(form, fields::PRICE, FieldType::Int32, &mut errors)?,
            quantity: bind_parsed(form, fields::QUANTITY, FieldType::Int32, &mut errors)?,
        };

        if errors.has_errors() {
            debug!(failures = errors.error_count(), "item binding failed for some fields");
        }
        Ok(Bound {
            target: item,
            errors,
        })
    }
}

/// Parse one field. Empty or missing text binds to `None`.
fn bind_parsed<N: FromStr>(
    form: &FormData,
    field: &str,
    field_type: FieldType,
    errors: &mut ErrorBag,
) -> Result<Option<N>> {
    let raw = match form.get(field) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    match raw.parse::<N>() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => {
            let codes = errors.resolver().resolve_field_codes(
                TYPE_MISMATCH,
                errors.object_name(),
                field,
                field_type.canonical_name(),
            );
            let error = FieldError::new(errors.object_name(), field, codes)
                .rejected_value(Value::Text(raw.to_string()))
                .binding_failure(true)
                .arguments(vec![Value::from(field)])
                .default_message(format!(
                    "Failed to convert value '{}' to required type '{}' for field '{}'",
                    raw, field_type, field
                ));
            errors.add_field_error(error)?;
            Ok(None)
        }
    }
}
