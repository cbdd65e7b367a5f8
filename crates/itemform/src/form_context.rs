// File: src/form_context.rs
// Purpose: Form context for re-rendering a form with its errors and submitted values

use std::collections::HashMap;

use crate::binding::FormData;
use crate::errors::{ErrorBag, Violation};
use crate::messages::Messages;
use crate::target::Target;

/// What a template needs to redisplay a rejected form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormContext {
    /// Field names to their first error message
    pub errors: HashMap<String, String>,
    /// Object error messages, in the order they were found
    pub global_errors: Vec<String>,
    /// Values to put back into the inputs
    pub values: HashMap<String, String>,
}

impl FormContext {
    /// Create a new form context with errors and values
    pub fn new(errors: HashMap<String, String>, values: HashMap<String, String>) -> Self {
        Self {
            errors,
            global_errors: Vec::new(),
            values,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the raw submission, so text that failed to bind is shown
    /// exactly as typed.
    pub fn from_submission(form: &FormData, errors: &ErrorBag, messages: &Messages) -> Self {
        let mut values = form.as_map().clone();
        for field_error in errors.field_errors() {
            values
                .entry(field_error.field.clone())
                .or_insert_with(|| field_error.rejected_value.to_input_string());
        }
        Self::with_messages(errors, messages, values)
    }

    /// Build from a bound target; fields with errors show their rejected value
    pub fn from_target(target: &dyn Target, errors: &ErrorBag, messages: &Messages) -> Self {
        let values = target
            .field_names()
            .iter()
            .map(|field| {
                let shown = match errors.field_value(field) {
                    Some(rejected) => rejected.to_input_string(),
                    None => target
                        .field_value(field)
                        .map(|v| v.to_input_string())
                        .unwrap_or_default(),
                };
                (field.to_string(), shown)
            })
            .collect();
        Self::with_messages(errors, messages, values)
    }

    fn with_messages(errors: &ErrorBag, messages: &Messages, values: HashMap<String, String>) -> Self {
        let mut context = Self {
            values,
            ..Self::default()
        };
        for violation in errors.all_errors() {
            let text = render(violation, messages);
            match violation {
                Violation::Field(e) => {
                    context.errors.entry(e.field.clone()).or_insert(text);
                }
                Violation::Object(_) => context.global_errors.push(text),
            }
        }
        context
    }

    /// Check if field has an error
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get error message for a field
    pub fn get_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|s| s.as_str())
    }

    pub fn get_errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn global_errors(&self) -> &[String] {
        &self.global_errors
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.global_errors.is_empty()
    }

    /// Get original value for a field
    pub fn get_value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(|s| s.as_str())
    }

    pub fn get_values(&self) -> &HashMap<String, String> {
        &self.values
    }
}

// Unresolved violations show their most specific code
fn render(violation: &Violation, messages: &Messages) -> String {
    messages
        .message_for(violation)
        .or_else(|| violation.codes().first().cloned())
        .unwrap_or_default()
}
