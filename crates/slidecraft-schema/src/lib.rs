//! # slidecraft-schema
//!
//! Restricted JSON-Schema subset compiler and content validator.
//!
//! Template content schemas in slidecraft use a deliberately small subset of
//! JSON Schema: `type`, `required`, `properties`, `items`, `pattern`, `enum`,
//! `minItems`, `maxItems`, and `oneOf`. This crate compiles such a
//! declaration into an executable [`Schema`] and validates loosely-typed
//! content (`serde_json::Value`) against it, producing path-qualified error
//! messages of the form `dotted.path: message`.
//!
//! ## Semantics
//!
//! - A missing `type` defaults to `object`.
//! - Objects are **open**: keys not declared under `properties` always pass
//!   through unchecked. Templates evolve independently of content authors.
//! - `oneOf` is a union; a single-member `oneOf` collapses to that member.
//! - `enum` on a string validates membership only; `pattern` is ignored when
//!   `enum` is present.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use slidecraft_schema::compile;
//!
//! let schema = compile(&json!({
//!     "type": "object",
//!     "required": ["title"],
//!     "properties": {"title": {"type": "string"}}
//! })).unwrap();
//!
//! let outcome = schema.validate(&json!({"subtitle": "only"}));
//! assert!(!outcome.valid);
//! assert_eq!(outcome.errors[0].to_string(), "title: missing required field \"title\"");
//! ```

mod error;
mod schema;
mod validator;

pub use error::{FieldError, SchemaError, SchemaResult, Validation, join_field_errors};
pub use schema::{ArraySchema, NumberSchema, ObjectSchema, Schema, StringSchema, compile};
