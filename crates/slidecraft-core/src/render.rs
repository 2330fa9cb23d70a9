/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document assembly.
//!
//! The renderer joins transformed slide bodies under a metadata header
//! block. The downstream slide toolchain consumes this format literally,
//! so the header layout and separator placement are exact contracts, not
//! style choices.

use crate::Meta;
use serde_json::Value;

/// Marker line opening and closing the metadata header block.
const HEADER_MARKER: &str = "---";

/// Separator emitted before every slide body after the first.
const SLIDE_SEPARATOR: &str = "\n\n---\n\n";

/// Header key introducing the aggregated stylesheet block.
const STYLE_KEY: &str = "style";

/// Indentation applied to each stylesheet line inside the header.
const STYLE_INDENT: &str = "  ";

/// Characters in a string header value that force double-quoting.
const QUOTE_TRIGGERS: [char; 8] = [':', '#', '[', ']', '{', '}', '|', '>'];

/// Options controlling document assembly.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit the `theme` header entry (skipped when the theme is empty).
    pub include_theme: bool,
    /// Extra header entries, emitted after the standard ones in the given
    /// order.
    pub extra_headers: Vec<(String, Value)>,
    /// Aggregated stylesheet; a non-empty value becomes the multi-line
    /// `style` header block.
    pub stylesheet: Option<String>,
    /// Speaker notes per slide index; non-empty notes are embedded after
    /// the slide's body as a comment block.
    pub notes: Vec<Option<String>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_theme: true,
            extra_headers: Vec::new(),
            stylesheet: None,
            notes: Vec::new(),
        }
    }
}

/// Assemble the final document from transformed slide bodies and metadata.
///
/// Zero slides produce exactly the header block with nothing appended. The
/// first body follows the header with no separator; every subsequent body
/// is preceded by one separator line. Notes never add separators.
pub fn render_document(bodies: &[String], meta: &Meta, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(HEADER_MARKER);
    out.push('\n');

    push_header(&mut out, "title", &Value::String(meta.title.clone()));
    if let Some(author) = &meta.author {
        push_header(&mut out, "author", &Value::String(author.clone()));
    }
    if let Some(date) = &meta.date {
        push_header(&mut out, "date", &Value::String(date.clone()));
    }
    if options.include_theme && !meta.theme.is_empty() {
        push_header(&mut out, "theme", &Value::String(meta.theme.clone()));
    }
    for (key, value) in &options.extra_headers {
        push_header(&mut out, key, value);
    }
    if let Some(stylesheet) = options.stylesheet.as_deref() {
        if !stylesheet.is_empty() {
            out.push_str(STYLE_KEY);
            out.push_str(": |\n");
            for line in stylesheet.lines() {
                out.push_str(STYLE_INDENT);
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out.push_str(HEADER_MARKER);
    out.push('\n');

    for (index, body) in bodies.iter().enumerate() {
        if index == 0 {
            out.push('\n');
        } else {
            out.push_str(SLIDE_SEPARATOR);
        }
        out.push_str(body);

        if let Some(note) = options.notes.get(index).and_then(Option::as_deref) {
            let note = note.trim();
            if !note.is_empty() {
                out.push_str("\n\n<!--\n");
                out.push_str(note);
                out.push_str("\n-->");
            }
        }
    }

    out
}

fn push_header(out: &mut String, key: &str, value: &Value) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&encode_header_value(value));
    out.push('\n');
}

/// Encode one header value: booleans and numbers as their literal text,
/// strings double-quoted when they contain a character the downstream
/// parser would misread, everything else in its JSON string form.
fn encode_header_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.contains(QUOTE_TRIGGERS) {
                format!("\"{}\"", s.replace('"', "\\\""))
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}
