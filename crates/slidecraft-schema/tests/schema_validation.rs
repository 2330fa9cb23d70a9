//! Integration tests exercising schema compilation and validation together.

use pretty_assertions::assert_eq;
use serde_json::json;
use slidecraft_schema::{Schema, compile};

fn compiled(decl: serde_json::Value) -> Schema {
    compile(&decl).expect("schema should compile")
}

#[test]
fn test_realistic_template_schema() {
    // The shape a "bullets" slide template would declare.
    let schema = compiled(json!({
        "type": "object",
        "required": ["title", "points"],
        "properties": {
            "title": {"type": "string"},
            "points": {
                "type": "array",
                "items": {"type": "string"},
                "minItems": 1,
                "maxItems": 8
            },
            "columns": {"type": "integer"},
            "align": {"type": "string", "enum": ["left", "center", "right"]}
        }
    }));

    let good = json!({
        "title": "Why Rust",
        "points": ["speed", "safety"],
        "columns": 2,
        "align": "left",
        "speakerOnly": true
    });
    assert!(schema.validate(&good).valid);

    let bad = json!({
        "points": [],
        "columns": 1.5,
        "align": "justified"
    });
    let outcome = schema.validate(&bad);
    assert!(!outcome.valid);
    let rendered: Vec<String> = outcome.errors.iter().map(ToString::to_string).collect();
    // Required failures first, then declared properties in name order.
    assert_eq!(
        rendered,
        vec![
            "title: missing required field \"title\"".to_string(),
            "align: value must be one of: left, center, right".to_string(),
            "columns: expected integer, got fractional number".to_string(),
            "points: expected at least 1 items, got 0".to_string(),
        ]
    );
}

#[test]
fn test_one_of_with_object_variants() {
    let schema = compiled(json!({
        "oneOf": [
            {"type": "string"},
            {
                "type": "object",
                "required": ["src"],
                "properties": {"src": {"type": "string"}}
            }
        ]
    }));

    assert!(schema.validate(&json!("image.png")).valid);
    assert!(schema.validate(&json!({"src": "image.png", "alt": "x"})).valid);
    assert!(!schema.validate(&json!({"alt": "missing src"})).valid);
}

#[test]
fn test_default_object_type_passthrough() {
    // No `type` at all: behaves as an open object.
    let schema = compiled(json!({}));
    assert!(schema.validate(&json!({"free": "form"})).valid);
    assert!(!schema.validate(&json!("scalar")).valid);
}
