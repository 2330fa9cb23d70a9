//! Integration tests for presentation parsing.

use pretty_assertions::assert_eq;
use serde_json::json;
use slidecraft_parse::{ParseError, parse, parse_with_lines};

const FULL_DOCUMENT: &str = "\
meta:
  title: Quarterly Review
  author: Ada
  date: 2026-08-01
  theme: gaia
  referencesConfig:
    enabled: false
    style: ieee
slides:
  - template: title
    content:
      title: Q2 in Review
    class: lead
    notes: Welcome everyone.
  - template: bullets
    content:
      title: Highlights
      points:
        - Shipped the parser
        - Deleted the legacy path
  - template: raw
    raw: \"# Handwritten slide\"
";

#[test]
fn test_full_document() {
    let presentation = parse(FULL_DOCUMENT).unwrap();

    assert_eq!(presentation.meta.title, "Quarterly Review");
    assert_eq!(presentation.meta.author.as_deref(), Some("Ada"));
    assert_eq!(presentation.meta.date.as_deref(), Some("2026-08-01"));
    assert_eq!(presentation.meta.theme, "gaia");
    assert!(!presentation.meta.references.enabled);
    assert_eq!(presentation.meta.references.style, "ieee");

    assert_eq!(presentation.slides.len(), 3);
    let first = &presentation.slides[0];
    assert_eq!(first.template, "title");
    assert_eq!(first.class.as_deref(), Some("lead"));
    assert_eq!(first.notes.as_deref(), Some("Welcome everyone."));
    assert_eq!(first.content.get("title"), Some(&json!("Q2 in Review")));

    let second = &presentation.slides[1];
    assert_eq!(
        second.content.get("points"),
        Some(&json!(["Shipped the parser", "Deleted the legacy path"]))
    );

    let third = &presentation.slides[2];
    assert!(third.is_raw());
    assert_eq!(third.raw.as_deref(), Some("# Handwritten slide"));
}

#[test]
fn test_unknown_content_keys_pass_through() {
    let text = "\
meta:
  title: T
slides:
  - template: anything
    content:
      declared: yes
      extra:
        deeply: [1, 2, 3]
";
    let presentation = parse(text).unwrap();
    let content = &presentation.slides[0].content;
    assert_eq!(content.get("extra"), Some(&json!({"deeply": [1, 2, 3]})));
}

#[test]
fn test_parse_with_lines_tracks_slides() {
    let parsed = parse_with_lines(FULL_DOCUMENT).unwrap();
    assert_eq!(
        parsed.slide_lines.len(),
        parsed.presentation.slides.len()
    );
    // Slide entries begin at these source lines of FULL_DOCUMENT.
    assert_eq!(parsed.slide_lines, vec![10, 15, 21]);
}

#[test]
fn test_parse_with_lines_without_slides() {
    let parsed = parse_with_lines("meta:\n  title: T\n").unwrap();
    assert!(parsed.slide_lines.is_empty());
}

#[test]
fn test_parse_with_lines_error_kinds_match_parse() {
    assert!(matches!(
        parse_with_lines("meta: {}\n"),
        Err(ParseError::Validation { .. })
    ));
    assert!(matches!(
        parse_with_lines("meta:\n\ttitle: T\n"),
        Err(ParseError::Syntax(_))
    ));
}

#[test]
fn test_validation_error_reports_every_failure() {
    let text = "\
meta:
  title: T
  theme: 3
slides:
  - template: title
    class: [not, a, string]
";
    let err = parse(text).unwrap_err();
    let errors = err.field_errors();
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"meta.theme"));
    assert!(paths.contains(&"slides.0.class"));
}
