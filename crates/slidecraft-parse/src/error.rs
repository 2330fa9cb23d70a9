//! Error types for presentation parsing.

use slidecraft_schema::{FieldError, join_field_errors};
use thiserror::Error;
use yaml_rust2::scanner::ScanError;

/// Errors raised at the parse boundary.
///
/// The two kinds are deliberately distinct: `Syntax` means the source text
/// is not well-formed YAML (and carries the underlying scan error);
/// `Validation` means the document parsed but does not satisfy the
/// presentation schema (and carries structured per-field detail).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is not well-formed YAML.
    #[error("YAML syntax error: {0}")]
    Syntax(#[from] ScanError),

    /// The document is well-formed but fails the presentation schema.
    #[error("Invalid presentation: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },
}

impl ParseError {
    /// Structured field errors, when this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ParseError::Validation { errors } => errors,
            ParseError::Syntax(_) => &[],
        }
    }
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
