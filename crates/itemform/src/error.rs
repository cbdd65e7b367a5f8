// File: src/error.rs
// Purpose: Hard failures of the engine (violations are never errors)

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No constraint set or validator accepts the target's type
    #[error("no validator supports target type `{type_name}`")]
    UnsupportedTarget { type_name: &'static str },

    /// A violation must carry at least one message code
    #[error("violation for object '{object_name}'{} has no message codes", field_suffix(.field))]
    MissingCodes {
        object_name: String,
        field: Option<String>,
    },

    /// A field-level rejection named a field the target does not declare
    #[error("object '{object_name}' has no field '{field}'")]
    UnknownField { object_name: String, field: String },

    /// A violation or merged bag belongs to a different object
    #[error("violation for object '{found}' added to the bag for '{expected}'")]
    ObjectNameMismatch { expected: String, found: String },

    /// A constraint was declared with contradictory parameters
    #[error("invalid constraint on '{field}': {reason}")]
    InvalidRule { field: String, reason: String },
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(", field '{}'", f))
        .unwrap_or_default()
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
