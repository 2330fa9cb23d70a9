//! # slidecraft-parse
//!
//! Presentation document parsing with schema-driven validation and an
//! optional line-tracking variant.
//!
//! A presentation source is YAML: a `meta` mapping plus an ordered `slides`
//! sequence, each slide bound to a named template. [`parse`] produces the
//! typed [`Presentation`] model with defaults applied; [`parse_with_lines`]
//! additionally reports the 1-based source line of every slide entry, for
//! callers that want to attach line context to downstream errors.
//!
//! ## Example
//!
//! ```rust
//! use slidecraft_parse::parse;
//!
//! let presentation = parse("meta:\n  title: My Deck\n").unwrap();
//! assert_eq!(presentation.meta.title, "My Deck");
//! assert_eq!(presentation.meta.theme, "default");
//! assert!(presentation.slides.is_empty());
//! ```

mod error;
pub mod located;
mod model;
mod parser;
mod value;

pub use error::{ParseError, ParseResult};
pub use model::{
    DEFAULT_CITATION_STYLE, DEFAULT_THEME, Meta, Presentation, RAW_TEMPLATE, ReferencesConfig,
    Slide,
};
pub use parser::{ParsedWithLines, parse, parse_with_lines};
pub use value::yaml_to_json;
