/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and evaluation.

use thiserror::Error;

/// Errors that can occur during template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Error parsing the template syntax.
    #[error("Template parse error: {message}")]
    Parse { message: String },

    /// Error evaluating the template.
    #[error("Template evaluation error: {message}")]
    Eval { message: String },

    /// Unknown filter name.
    #[error("Unknown filter: {name}")]
    UnknownFilter { name: String },
}

impl TemplateError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        TemplateError::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn eval(message: impl Into<String>) -> Self {
        TemplateError::Eval {
            message: message.into(),
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
