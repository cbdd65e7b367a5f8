// File: src/messages.rs
// Purpose: Message lookup - first matching key wins, then the fallback message

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::errors::Violation;
use crate::value::Value;

// Built-in templates; `{n}` is replaced by the n-th violation argument
static BUILTIN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("required.item.itemName", "Item name is required."),
        ("range.item.price", "Price must be between {0} and {1}."),
        ("max.item.quantity", "Quantity can be at most {0}."),
        (
            "totalPriceMin",
            "Price * quantity must be at least {0}. Current value = {1}.",
        ),
        ("required", "This field is required."),
        ("range", "Must be between {0} and {1}."),
        ("max", "Must be at most {0}."),
        ("min", "Must be at least {0}."),
        ("typeMismatch.i32", "Please enter a whole number."),
        ("typeMismatch.i64", "Please enter a whole number."),
        ("typeMismatch", "The value has the wrong format."),
    ])
});

/// Key to template table queried with a violation's codes in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Messages {
    /// Empty table; only fallback messages resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the built-in templates
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    /// Add or replace templates
    pub fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, templates: I) {
        self.templates.extend(templates);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Key of the first code that has a template
    pub fn matching_code<'a>(&self, codes: &'a [String]) -> Option<&'a str> {
        codes
            .iter()
            .map(String::as_str)
            .find(|code| self.templates.contains_key(*code))
    }

    /// First template matching `codes`, interpolated; else `default`
    pub fn resolve(&self, codes: &[String], arguments: &[Value], default: Option<&str>) -> Option<String> {
        self.matching_code(codes)
            .and_then(|code| self.get(code))
            .or(default)
            .map(|template| interpolate(template, arguments))
    }

    pub fn message_for(&self, violation: &Violation) -> Option<String> {
        self.resolve(
            violation.codes(),
            violation.arguments(),
            violation.default_message(),
        )
    }
}

/// Replace `{n}` placeholders with the display form of `arguments[n]`.
/// Placeholders without a matching argument are left as written.
pub fn interpolate(template: &str, arguments: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let argument = arguments.get(index)?;
            Some((argument.to_string(), close))
        });
        match replaced {
            Some((text, close)) => {
                out.push_str(&text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
