/*
 * pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! End-to-end compilation pipeline.
//!
//! ## Pipeline stages
//!
//! 1. **Parse**: source text → [`Presentation`]
//! 2. **Transform**: per-slide template expansion with deferred icon and
//!    citation resolution
//! 3. **Aggregate**: stylesheet fragments of the distinct templates used
//! 4. **Render**: header block + slide bodies → final document text
//!
//! The registry must be fully populated before this runs; it is read-only
//! from here on.

use crate::collaborators::{CitationFormatter, IconResolver};
use crate::error::CompileResult;
use crate::render::{RenderOptions, render_document};
use crate::transform::transform_presentation;
use serde_json::Value;
use slidecraft_parse::{Presentation, parse};
use slidecraft_template::TemplateRegistry;
use std::collections::HashSet;

/// Options for the compile pipeline, forwarded into document rendering.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Emit the `theme` header entry.
    pub include_theme: bool,
    /// Extra header entries appended after the standard ones.
    pub extra_headers: Vec<(String, Value)>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_theme: true,
            extra_headers: Vec::new(),
        }
    }
}

/// Compile a presentation source document into the final output text.
pub async fn compile(
    source: &str,
    registry: &TemplateRegistry,
    icons: &dyn IconResolver,
    refs: &dyn CitationFormatter,
    options: &CompileOptions,
) -> CompileResult<String> {
    let presentation = parse(source)?;
    compile_presentation(&presentation, registry, icons, refs, options).await
}

/// Compile an already-parsed presentation into the final output text.
pub async fn compile_presentation(
    presentation: &Presentation,
    registry: &TemplateRegistry,
    icons: &dyn IconResolver,
    refs: &dyn CitationFormatter,
    options: &CompileOptions,
) -> CompileResult<String> {
    let bodies = transform_presentation(presentation, registry, icons, refs).await?;

    let render_options = RenderOptions {
        include_theme: options.include_theme,
        extra_headers: options.extra_headers.clone(),
        stylesheet: aggregate_css(presentation, registry),
        notes: presentation
            .slides
            .iter()
            .map(|slide| slide.notes.clone())
            .collect(),
    };

    tracing::debug!(slides = bodies.len(), "Rendering document");
    Ok(render_document(&bodies, &presentation.meta, &render_options))
}

/// Collect the `css` fragments of the distinct templates used by the
/// presentation, in first-use order, one occurrence per template name.
fn aggregate_css(presentation: &Presentation, registry: &TemplateRegistry) -> Option<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut fragments: Vec<&str> = Vec::new();

    for slide in &presentation.slides {
        if slide.is_raw() || !seen.insert(slide.template.as_str()) {
            continue;
        }
        if let Some(css) = registry.get(&slide.template).and_then(|def| def.css.as_deref()) {
            let css = css.trim();
            if !css.is_empty() {
                fragments.push(css);
            }
        }
    }

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join("\n\n"))
    }
}
