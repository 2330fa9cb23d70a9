//! Presentation document parser.
//!
//! Parsing is schema-driven: the YAML source is converted to a loose value
//! tree, validated against the presentation schema (built with
//! `slidecraft-schema`), and only then lowered into the typed model with
//! defaults applied. [`parse_with_lines`] additionally walks the raw,
//! pre-validation document tree to capture each slide's source line, since
//! that information does not survive defaulting.

use crate::error::{ParseError, ParseResult};
use crate::located::{self, LocatedYaml};
use crate::model::{
    DEFAULT_CITATION_STYLE, DEFAULT_THEME, Meta, Presentation, ReferencesConfig, Slide,
};
use crate::value::yaml_to_json;
use once_cell::sync::Lazy;
use serde_json::{Map, Value, json};
use slidecraft_schema::{Schema, compile};
use yaml_rust2::YamlLoader;

/// Schema every presentation document must satisfy. Object properties are
/// open, so unknown metadata keys pass through without error.
static PRESENTATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    compile(&json!({
        "type": "object",
        "required": ["meta"],
        "properties": {
            "meta": {
                "type": "object",
                "required": ["title"],
                "properties": {
                    "title": {"type": "string", "pattern": "\\S"},
                    "author": {"type": "string"},
                    "date": {"type": "string"},
                    "theme": {"type": "string"},
                    "referencesConfig": {
                        "type": "object",
                        "properties": {
                            "enabled": {"type": "boolean"},
                            "style": {"type": "string"}
                        }
                    }
                }
            },
            "slides": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["template"],
                    "properties": {
                        "template": {"type": "string", "pattern": "\\S"},
                        "content": {"type": "object"},
                        "class": {"type": "string"},
                        "notes": {"type": "string"},
                        "raw": {"type": "string"}
                    }
                }
            }
        }
    }))
    .expect("presentation schema is well-formed")
});

/// Parse a presentation document from source text.
///
/// # Errors
///
/// [`ParseError::Syntax`] when the text is not well-formed YAML;
/// [`ParseError::Validation`] when it parses but fails the presentation
/// schema (e.g. a missing `meta.title`).
pub fn parse(text: &str) -> ParseResult<Presentation> {
    let document = load_document(text)?;
    build_presentation(&document)
}

/// A parsed presentation together with per-slide source lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWithLines {
    pub presentation: Presentation,
    /// 1-based source line of each slide entry, in presentation order.
    pub slide_lines: Vec<usize>,
}

/// Parse a presentation and capture each slide's 1-based source line.
///
/// Raises the same error kinds as [`parse`].
pub fn parse_with_lines(text: &str) -> ParseResult<ParsedWithLines> {
    let presentation = parse(text)?;
    let located = located::parse_located(text)?;
    Ok(ParsedWithLines {
        presentation,
        slide_lines: collect_slide_lines(&located),
    })
}

fn load_document(text: &str) -> ParseResult<Value> {
    let documents = YamlLoader::load_from_str(text)?;
    // Multi-document sources use the first document.
    Ok(documents.first().map(yaml_to_json).unwrap_or(Value::Null))
}

fn build_presentation(document: &Value) -> ParseResult<Presentation> {
    let outcome = PRESENTATION_SCHEMA.validate(document);
    if !outcome.valid {
        return Err(ParseError::Validation {
            errors: outcome.errors,
        });
    }

    // The schema guarantees the shape read below; this stage only applies
    // defaults.
    let empty = Map::new();
    let root = document.as_object().unwrap_or(&empty);
    let meta_map = root.get("meta").and_then(Value::as_object).unwrap_or(&empty);

    let meta = Meta {
        title: string_field(meta_map, "title").unwrap_or_default(),
        author: string_field(meta_map, "author"),
        date: string_field(meta_map, "date"),
        theme: string_field(meta_map, "theme").unwrap_or_else(|| DEFAULT_THEME.to_string()),
        references: references_config(meta_map),
    };

    let slides = root
        .get("slides")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(build_slide).collect())
        .unwrap_or_default();

    Ok(Presentation { meta, slides })
}

fn references_config(meta: &Map<String, Value>) -> ReferencesConfig {
    let empty = Map::new();
    let config = meta
        .get("referencesConfig")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    ReferencesConfig {
        enabled: config.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        style: string_field(config, "style")
            .unwrap_or_else(|| DEFAULT_CITATION_STYLE.to_string()),
    }
}

fn build_slide(value: &Value) -> Slide {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);
    Slide {
        template: string_field(map, "template").unwrap_or_default(),
        content: map
            .get("content")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        class: string_field(map, "class"),
        notes: string_field(map, "notes"),
        raw: string_field(map, "raw"),
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn collect_slide_lines(document: &LocatedYaml) -> Vec<usize> {
    document
        .get("slides")
        .and_then(LocatedYaml::items)
        .map(|items| items.iter().map(LocatedYaml::line).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_defaults() {
        let presentation = parse("meta:\n  title: T\n").unwrap();
        assert_eq!(presentation.meta.title, "T");
        assert_eq!(presentation.meta.theme, DEFAULT_THEME);
        assert!(presentation.meta.author.is_none());
        assert!(presentation.slides.is_empty());
        assert!(presentation.meta.references.enabled);
        assert_eq!(presentation.meta.references.style, DEFAULT_CITATION_STYLE);
    }

    #[test]
    fn test_missing_title_is_validation() {
        let err = parse("meta: {}\n").unwrap_err();
        match err {
            ParseError::Validation { errors } => {
                assert_eq!(errors[0].path, "meta.title");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_document_is_validation() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, ParseError::Validation { .. }));
    }

    #[test]
    fn test_tab_indentation_is_syntax() {
        let err = parse("meta:\n\ttitle: T\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn test_slide_content_defaults_to_empty() {
        let presentation = parse("meta:\n  title: T\nslides:\n  - template: title\n").unwrap();
        assert_eq!(presentation.slides.len(), 1);
        assert!(presentation.slides[0].content.is_empty());
    }

    #[test]
    fn test_slide_missing_template_is_validation() {
        let err = parse("meta:\n  title: T\nslides:\n  - content: {}\n").unwrap_err();
        match err {
            ParseError::Validation { errors } => {
                assert_eq!(errors[0].path, "slides.0.template");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
