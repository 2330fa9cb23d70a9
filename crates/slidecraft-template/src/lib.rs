/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template engine and template registry for slidecraft.
//!
//! The engine is a pure, synchronous string templating pass. It supports:
//!
//! - Variable interpolation: `{{ content.title }}`
//! - Conditionals: `{% if x %}...{% elif y %}...{% else %}...{% endif %}`
//! - Iteration: `{% for point in content.points %}...{% endfor %}`
//! - Filters: `default(value)`, `trim`, `escape`, `length`
//! - Helper calls: `{{ icons.render("star", size=24) }}`
//!
//! Undefined variable references render as the empty string. Helper
//! functions injected through the context are synchronous callables whose
//! returned strings are spliced into the output verbatim. The engine never
//! escapes on its own, because the output target mixes raw HTML and
//! Markdown and escaping must remain the caller's choice.
//!
//! The registry loads named template definitions (content schema + output
//! template text + optional stylesheet fragment) from YAML declarations,
//! with last-write-wins override semantics across source trees.
//!
//! # Example
//!
//! ```rust
//! use slidecraft_template::{Template, TemplateContext, TemplateValue};
//!
//! let template = Template::compile("Hello, {{ name }}!").unwrap();
//! let mut ctx = TemplateContext::new();
//! ctx.insert("name", TemplateValue::String("World".to_string()));
//! assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod registry;

// Re-export main types at crate root
pub use ast::{Expr, Literal, Node};
pub use context::{HelperFn, TemplateContext, TemplateValue, format_number};
pub use error::{TemplateError, TemplateResult};
pub use parser::Template;
pub use registry::{RegistryError, TemplateDefinition, TemplateRegistry};
