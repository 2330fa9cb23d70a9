/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Core transformation and rendering for slidecraft.
//!
//! This crate turns a parsed presentation into the final flat Markdown
//! document:
//!
//! - [`transform_slide`] / [`transform_presentation`]: per-slide template
//!   expansion, reconciling the synchronous template engine with the
//!   asynchronous icon and citation collaborators through a two-phase
//!   placeholder protocol
//! - [`render_document`]: header block and body assembly
//! - [`compile`]: the end-to-end pipeline
//!
//! The icon resolver and citation formatter are abstract collaborators
//! ([`IconResolver`], [`CitationFormatter`]); this core performs no I/O of
//! its own beyond template loading in `slidecraft-template`.
//!
//! # Example
//!
//! ```ignore
//! use slidecraft_core::{CompileOptions, compile};
//! use slidecraft_template::TemplateRegistry;
//!
//! let mut registry = TemplateRegistry::new();
//! registry.load_dir("templates/builtin")?;
//! registry.load_dir("templates/custom")?;
//!
//! let output = compile(&source, &registry, &icons, &refs, &CompileOptions::default()).await?;
//! ```

pub mod collaborators;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod transform;

// Re-export main types at crate root
pub use collaborators::{CitationFormatter, IconOptions, IconResolver};
pub use error::{CompileError, CompileResult, TransformError, TransformResult};
pub use pipeline::{CompileOptions, compile, compile_presentation};
pub use render::{RenderOptions, render_document};
pub use transform::{transform_presentation, transform_slide};

// Convenient re-exports from the sibling crates this API surfaces.
pub use slidecraft_parse::{Meta, Presentation, ReferencesConfig, Slide};
