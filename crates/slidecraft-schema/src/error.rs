// Error types for schema compilation and validation

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while compiling a schema declaration.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The declaration names a type outside the supported subset.
    #[error("Invalid schema type: {0}")]
    InvalidType(String),

    /// The declaration is structurally malformed.
    #[error("Invalid schema structure: {message}")]
    InvalidStructure { message: String },

    /// A `pattern` constraint is not a valid regular expression.
    #[error("Invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for schema compilation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single validation failure, qualified by the dotted path to the
/// offending value.
///
/// Array indices appear as numeric path segments (`sections.2.title`).
/// An empty path means the failure is about the root value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path from the root of the validated value.
    pub path: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Aggregated outcome of validating one value against a compiled schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// True when no failures were recorded.
    pub valid: bool,
    /// Every recorded failure, in discovery order.
    pub errors: Vec<FieldError>,
}

impl Validation {
    /// The successful outcome: `valid: true, errors: []`.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failed outcome carrying the collected errors.
    pub fn fail(errors: Vec<FieldError>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::ok()
    }
}

/// Render a list of field errors as a single `;`-joined line.
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("meta.title", "missing required field \"title\"");
        assert_eq!(err.to_string(), "meta.title: missing required field \"title\"");
    }

    #[test]
    fn test_root_field_error_display() {
        let err = FieldError::new("", "expected object, got string");
        assert_eq!(err.to_string(), "expected object, got string");
    }

    #[test]
    fn test_join_field_errors() {
        let errors = vec![
            FieldError::new("a", "first"),
            FieldError::new("b.c", "second"),
        ];
        assert_eq!(join_field_errors(&errors), "a: first; b.c: second");
    }
}
