// File: src/codes.rs
// Purpose: Expand one violation code into an ordered list of message lookup keys

use serde::{Deserialize, Serialize};

/// Where the violation code sits in a generated key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeFormat {
    /// `required.item.itemName`
    #[default]
    PrefixErrorCode,
    /// `item.itemName.required`
    PostfixErrorCode,
}

impl CodeFormat {
    fn join(self, code: &str, parts: &[&str]) -> String {
        let mut segments = Vec::with_capacity(parts.len() + 1);
        match self {
            CodeFormat::PrefixErrorCode => {
                segments.push(code);
                segments.extend_from_slice(parts);
            }
            CodeFormat::PostfixErrorCode => {
                segments.extend_from_slice(parts);
                segments.push(code);
            }
        }
        segments.join(".")
    }
}

/// Builds fallback lookup keys for violations, most specific first.
///
/// A message catalog is queried with each key in order and the first hit
/// wins. The resolver only computes keys; it never performs a lookup.
///
/// ```
/// use itemform::MessageCodesResolver;
///
/// let resolver = MessageCodesResolver::new();
/// assert_eq!(
///     resolver.resolve_field_codes("range", "item", "price", "i32"),
///     vec!["range.item.price", "range.price", "range.i32", "range"],
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCodesResolver {
    prefix: String,
    format: CodeFormat,
}

impl MessageCodesResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every generated key
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: CodeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self) -> CodeFormat {
        self.format
    }

    /// Keys for an object-level violation: `code.object`, `code`
    pub fn resolve_object_codes(&self, code: &str, object_name: &str) -> Vec<String> {
        [
            self.format.join(code, &[object_name]),
            self.format.join(code, &[]),
        ]
        .into_iter()
        .map(|key| self.post_process(key))
        .collect()
    }

    /// Keys for a field-level violation:
    /// `code.object.field`, `code.field`, `code.type`, `code`
    pub fn resolve_field_codes(
        &self,
        code: &str,
        object_name: &str,
        field: &str,
        type_name: &str,
    ) -> Vec<String> {
        [
            self.format.join(code, &[object_name, field]),
            self.format.join(code, &[field]),
            self.format.join(code, &[type_name]),
            self.format.join(code, &[]),
        ]
        .into_iter()
        .map(|key| self.post_process(key))
        .collect()
    }

    fn post_process(&self, key: String) -> String {
        if self.prefix.is_empty() {
            key
        } else {
            format!("{}{}", self.prefix, key)
        }
    }
}
