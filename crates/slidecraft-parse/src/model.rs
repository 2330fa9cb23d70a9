//! The in-memory presentation model.
//!
//! A [`Presentation`] is owned exclusively by one parse call and is immutable
//! after creation. Slide `content` is deliberately loose: an open
//! string-keyed map of `serde_json` values. Only the fields a template's
//! schema declares are ever type-checked; everything else passes through
//! untouched.

use serde_json::{Map, Value};

/// Theme applied when the document does not name one.
pub const DEFAULT_THEME: &str = "default";

/// Citation style applied when `referencesConfig.style` is absent.
pub const DEFAULT_CITATION_STYLE: &str = "apa";

/// Template name that bypasses expansion entirely.
pub const RAW_TEMPLATE: &str = "raw";

/// A parsed presentation: metadata plus an ordered slide list.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub meta: Meta,
    pub slides: Vec<Slide>,
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    /// Required, non-empty.
    pub title: String,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Defaults to [`DEFAULT_THEME`].
    pub theme: String,
    pub references: ReferencesConfig,
}

/// Reference/citation handling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencesConfig {
    /// Defaults to true.
    pub enabled: bool,
    /// Defaults to [`DEFAULT_CITATION_STYLE`].
    pub style: String,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: DEFAULT_CITATION_STYLE.to_string(),
        }
    }
}

/// One content unit bound to exactly one template.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Name of the template this slide expands through, or [`RAW_TEMPLATE`].
    pub template: String,
    /// Open content map; defaults to empty. Ignored for raw slides.
    pub content: Map<String, Value>,
    /// Optional class directive value for the rendered body.
    pub class: Option<String>,
    /// Optional speaker notes, embedded by the renderer.
    pub notes: Option<String>,
    /// Verbatim body for raw slides.
    pub raw: Option<String>,
}

impl Slide {
    /// Whether this slide bypasses template expansion.
    pub fn is_raw(&self) -> bool {
        self.template == RAW_TEMPLATE
    }
}
