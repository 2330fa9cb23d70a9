/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for slide transformation and document compilation.

use slidecraft_parse::ParseError;
use slidecraft_schema::{FieldError, join_field_errors};
use slidecraft_template::TemplateError;
use thiserror::Error;

/// Errors raised at the transform boundary. Any of these aborts the whole
/// document: slide ordinals are meaningful, and a partial deck is not a
/// valid artifact.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A slide names a template the registry does not contain.
    #[error("Unknown template: {name}")]
    TemplateNotFound { name: String },

    /// Slide content fails the template's content schema.
    #[error("Invalid content for template \"{template}\": {}", join_field_errors(.errors))]
    ContentValidation {
        template: String,
        errors: Vec<FieldError>,
    },

    /// The template engine failed while expanding the slide body.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A collaborator (icon resolver or citation formatter) failed.
    /// Propagated as-is; no retry, no partial substitution.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// Errors raised by the end-to-end compile pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
