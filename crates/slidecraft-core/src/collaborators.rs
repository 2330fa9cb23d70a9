/*
 * collaborators.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Collaborator interfaces.
//!
//! Icon resolution and citation formatting are external concerns: fetching
//! icon assets and talking to a reference manager both involve I/O this
//! core never performs. The transformer records requests during the
//! synchronous template pass and resolves them afterwards through these
//! async traits. Failures propagate as-is and are fatal to the enclosing
//! document.

use anyhow::Result;
use async_trait::async_trait;
use slidecraft_template::TemplateValue;
use std::collections::HashMap;

/// Options accepted by the icon resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconOptions {
    pub size: Option<u64>,
    pub color: Option<String>,
    pub class: Option<String>,
}

impl IconOptions {
    /// Build options from the keyword-argument map a template call
    /// produced. Keys outside the resolver contract are ignored.
    pub fn from_template_map(map: &HashMap<String, TemplateValue>) -> Self {
        Self {
            size: match map.get("size") {
                Some(TemplateValue::Number(n)) if *n >= 0.0 => Some(*n as u64),
                _ => None,
            },
            color: string_option(map, "color"),
            class: string_option(map, "class"),
        }
    }
}

fn string_option(map: &HashMap<String, TemplateValue>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(TemplateValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Resolves icon names to markup fragments.
#[async_trait]
pub trait IconResolver: Send + Sync {
    /// Resolve one icon request to a markup string.
    ///
    /// Called once per recorded request, never deduplicated: two identical
    /// requests in one slide resolve independently, so a failure surfaces
    /// at every occurrence.
    async fn render(&self, name: &str, options: &IconOptions) -> Result<String>;
}

/// Formats citations through an external reference manager.
#[async_trait]
pub trait CitationFormatter: Send + Sync {
    /// Format one inline citation.
    ///
    /// Implementations must not fail for an unrecognized id; the contract
    /// is to return a bracketed-id fallback instead.
    async fn format_inline(&self, id: &str) -> Result<String>;

    /// Expand every citation bracket group in `text`, applying the same
    /// unknown-id fallback per citation. One unknown id never fails the
    /// whole call.
    async fn expand_citations(&self, text: &str) -> Result<String>;
}
