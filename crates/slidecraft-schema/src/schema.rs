//! Schema type definitions and the declaration compiler.
//!
//! A schema declaration is an ordinary `serde_json::Value` using a restricted
//! subset of JSON Schema: `type`, `required`, `properties`, `items`,
//! `pattern`, `enum`, `minItems`, `maxItems`, and `oneOf`. Compilation turns
//! the declaration into an executable [`Schema`], rejecting declarations the
//! subset cannot express (unknown type names, non-string patterns, invalid
//! regular expressions).

use crate::error::{SchemaError, SchemaResult};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// A compiled, executable schema.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Accepts booleans.
    Boolean,
    /// Accepts numbers; integer schemas reject fractional values.
    Number(NumberSchema),
    /// Accepts strings, optionally constrained by `enum` or `pattern`.
    String(StringSchema),
    /// Accepts arrays, validating elements and length bounds.
    Array(ArraySchema),
    /// Accepts objects with open/passthrough property semantics.
    Object(ObjectSchema),
    /// Union: accepts a value matching any member schema.
    OneOf(Vec<Schema>),
    /// Accepts any value.
    Any,
}

#[derive(Debug, Clone)]
pub struct NumberSchema {
    /// True for `type: integer`, which rejects fractional values.
    pub integer: bool,
}

#[derive(Debug, Clone)]
pub struct StringSchema {
    /// Regex the value must match. Ignored when `allowed` is present.
    pub pattern: Option<Regex>,
    /// Allowed values from an `enum` constraint (membership only).
    pub allowed: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    /// Element schema; absent means any element is accepted.
    pub items: Option<Box<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ObjectSchema {
    /// Declared properties, ordered by name so error output is
    /// deterministic. Keys not declared here always pass through.
    pub properties: BTreeMap<String, Schema>,
    /// Property names that must be present.
    pub required: Vec<String>,
}

/// Compile a schema declaration into an executable [`Schema`].
///
/// # Errors
///
/// Returns a [`SchemaError`] when the declaration is not an object, names an
/// unsupported type, or carries a constraint the subset cannot compile
/// (e.g. an invalid `pattern` regex).
pub fn compile(declaration: &Value) -> SchemaResult<Schema> {
    let node = declaration
        .as_object()
        .ok_or_else(|| SchemaError::InvalidStructure {
            message: format!("schema declaration must be an object, got {declaration}"),
        })?;

    // oneOf is a union; a single member collapses to that member.
    if let Some(one_of) = node.get("oneOf") {
        let members = one_of
            .as_array()
            .ok_or_else(|| SchemaError::InvalidStructure {
                message: "oneOf must be an array of schemas".to_string(),
            })?;
        let mut compiled = Vec::with_capacity(members.len());
        for member in members {
            compiled.push(compile(member)?);
        }
        return match compiled.len() {
            0 => Err(SchemaError::InvalidStructure {
                message: "oneOf must contain at least one schema".to_string(),
            }),
            1 => Ok(compiled.remove(0)),
            _ => Ok(Schema::OneOf(compiled)),
        };
    }

    // Missing type defaults to object.
    let type_name = match node.get("type") {
        None => "object",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(SchemaError::InvalidStructure {
                message: format!("type must be a string, got {other}"),
            });
        }
    };

    match type_name {
        "boolean" => Ok(Schema::Boolean),
        "number" => Ok(Schema::Number(NumberSchema { integer: false })),
        "integer" => Ok(Schema::Number(NumberSchema { integer: true })),
        "string" => compile_string(node),
        "array" => compile_array(node),
        "object" => compile_object(node),
        "any" => Ok(Schema::Any),
        other => Err(SchemaError::InvalidType(other.to_string())),
    }
}

fn compile_string(node: &serde_json::Map<String, Value>) -> SchemaResult<Schema> {
    // enum wins over pattern when both are present.
    let allowed = match node.get("enum") {
        None => None,
        Some(Value::Array(values)) => Some(values.clone()),
        Some(other) => {
            return Err(SchemaError::InvalidStructure {
                message: format!("enum must be an array, got {other}"),
            });
        }
    };

    let pattern = match node.get("pattern") {
        Some(Value::String(p)) if allowed.is_none() => {
            Some(
                Regex::new(p).map_err(|source| SchemaError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })?,
            )
        }
        Some(Value::String(_)) | None => None,
        Some(other) => {
            return Err(SchemaError::InvalidStructure {
                message: format!("pattern must be a string, got {other}"),
            });
        }
    };

    Ok(Schema::String(StringSchema { pattern, allowed }))
}

fn compile_array(node: &serde_json::Map<String, Value>) -> SchemaResult<Schema> {
    let items = match node.get("items") {
        None => None,
        Some(decl) => Some(Box::new(compile(decl)?)),
    };
    Ok(Schema::Array(ArraySchema {
        items,
        min_items: usize_field(node, "minItems")?,
        max_items: usize_field(node, "maxItems")?,
    }))
}

fn compile_object(node: &serde_json::Map<String, Value>) -> SchemaResult<Schema> {
    let mut properties = BTreeMap::new();
    match node.get("properties") {
        None => {}
        Some(Value::Object(declared)) => {
            for (key, decl) in declared {
                properties.insert(key.clone(), compile(decl)?);
            }
        }
        Some(other) => {
            return Err(SchemaError::InvalidStructure {
                message: format!("properties must be an object, got {other}"),
            });
        }
    }

    let mut required = Vec::new();
    match node.get("required") {
        None => {}
        Some(Value::Array(names)) => {
            for name in names {
                match name.as_str() {
                    Some(s) => required.push(s.to_string()),
                    None => {
                        return Err(SchemaError::InvalidStructure {
                            message: format!("required entries must be strings, got {name}"),
                        });
                    }
                }
            }
        }
        Some(other) => {
            return Err(SchemaError::InvalidStructure {
                message: format!("required must be an array, got {other}"),
            });
        }
    }

    Ok(Schema::Object(ObjectSchema {
        properties,
        required,
    }))
}

fn usize_field(
    node: &serde_json::Map<String, Value>,
    key: &str,
) -> SchemaResult<Option<usize>> {
    match node.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| SchemaError::InvalidStructure {
                message: format!("{key} must be a non-negative integer, got {value}"),
            }),
    }
}
