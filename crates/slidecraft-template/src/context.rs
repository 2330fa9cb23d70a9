/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and context types.
//!
//! [`TemplateValue`] is the loose value model templates evaluate over. It is
//! independent of the presentation model; conversion from `serde_json`
//! values happens at the transformer layer. The [`Function`] variant carries
//! an injected helper: a synchronous callable whose returned string is
//! spliced into output verbatim, with no escaping.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A synchronous helper callable from template expressions.
pub type HelperFn = Rc<dyn Fn(&[TemplateValue]) -> String>;

/// A value usable in template evaluation.
#[derive(Clone)]
pub enum TemplateValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<TemplateValue>),
    Map(HashMap<String, TemplateValue>),
    /// An injected helper function. Renders as empty when interpolated
    /// directly; meaningful only when called.
    Function(HelperFn),
}

impl fmt::Debug for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Null => f.write_str("Null"),
            TemplateValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            TemplateValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            TemplateValue::String(s) => f.debug_tuple("String").field(s).finish(),
            TemplateValue::List(items) => f.debug_tuple("List").field(items).finish(),
            TemplateValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            TemplateValue::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl PartialEq for TemplateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TemplateValue::Null, TemplateValue::Null) => true,
            (TemplateValue::Bool(a), TemplateValue::Bool(b)) => a == b,
            (TemplateValue::Number(a), TemplateValue::Number(b)) => a == b,
            (TemplateValue::String(a), TemplateValue::String(b)) => a == b,
            (TemplateValue::List(a), TemplateValue::List(b)) => a == b,
            (TemplateValue::Map(a), TemplateValue::Map(b)) => a == b,
            (TemplateValue::Function(a), TemplateValue::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl TemplateValue {
    /// Truthiness for conditional evaluation: false, null, the empty
    /// string, the empty list, and the empty map are falsy; everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            TemplateValue::Null => false,
            TemplateValue::Bool(b) => *b,
            TemplateValue::Number(_) => true,
            TemplateValue::String(s) => !s.is_empty(),
            TemplateValue::List(items) => !items.is_empty(),
            TemplateValue::Map(map) => !map.is_empty(),
            TemplateValue::Function(_) => true,
        }
    }

    /// Get a nested field by path (`["content", "title"]`).
    pub fn get_path(&self, path: &[&str]) -> Option<&TemplateValue> {
        if path.is_empty() {
            return Some(self);
        }
        match self {
            TemplateValue::Map(map) => map.get(path[0]).and_then(|v| v.get_path(&path[1..])),
            _ => None,
        }
    }

    /// Render this value as output text.
    ///
    /// Null, boolean false, and functions render as the empty string;
    /// integral numbers render without a decimal point; lists concatenate
    /// their rendered elements.
    pub fn render(&self) -> String {
        match self {
            TemplateValue::Null => String::new(),
            TemplateValue::Bool(true) => "true".to_string(),
            TemplateValue::Bool(false) => String::new(),
            TemplateValue::Number(n) => format_number(*n),
            TemplateValue::String(s) => s.clone(),
            TemplateValue::List(items) => items.iter().map(TemplateValue::render).collect(),
            TemplateValue::Map(_) => "true".to_string(),
            TemplateValue::Function(_) => String::new(),
        }
    }

    /// Element count for the `length` filter: characters for strings,
    /// entries for lists and maps.
    pub fn length(&self) -> Option<usize> {
        match self {
            TemplateValue::String(s) => Some(s.chars().count()),
            TemplateValue::List(items) => Some(items.len()),
            TemplateValue::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Convert a `serde_json` value into a template value.
    pub fn from_json(value: &Value) -> TemplateValue {
        match value {
            Value::Null => TemplateValue::Null,
            Value::Bool(b) => TemplateValue::Bool(*b),
            Value::Number(n) => TemplateValue::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => TemplateValue::String(s.clone()),
            Value::Array(items) => {
                TemplateValue::List(items.iter().map(TemplateValue::from_json).collect())
            }
            Value::Object(map) => TemplateValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), TemplateValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl Default for TemplateValue {
    fn default() -> Self {
        TemplateValue::Null
    }
}

/// Render a number the way templates expect: integral values without a
/// decimal point.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A context for template evaluation containing variable bindings.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Variable bindings at this level.
    variables: HashMap<String, TemplateValue>,

    /// Parent context for nested scopes (loop bodies).
    parent: Option<Box<TemplateContext>>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: TemplateValue) {
        self.variables.insert(key.into(), value);
    }

    /// Get a variable, checking parent scopes.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.variables
            .get(key)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get(key)))
    }

    /// Get a variable by path segments (`["content", "title"]`).
    pub fn get_path(&self, path: &[&str]) -> Option<&TemplateValue> {
        if path.is_empty() {
            return None;
        }
        self.get(path[0]).and_then(|v| v.get_path(&path[1..]))
    }

    /// Create a child context for a nested scope. The child inherits
    /// access to parent variables.
    pub fn child(&self) -> TemplateContext {
        TemplateContext {
            variables: HashMap::new(),
            parent: Some(Box::new(self.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(TemplateValue::Bool(true).is_truthy());
        assert!(!TemplateValue::Bool(false).is_truthy());
        assert!(!TemplateValue::Null.is_truthy());
        assert!(TemplateValue::String("x".into()).is_truthy());
        assert!(!TemplateValue::String(String::new()).is_truthy());
        assert!(TemplateValue::Number(0.0).is_truthy());
        assert!(!TemplateValue::List(vec![]).is_truthy());
        assert!(!TemplateValue::Map(HashMap::new()).is_truthy());
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(TemplateValue::Number(3.0).render(), "3");
        assert_eq!(TemplateValue::Number(2.5).render(), "2.5");
        assert_eq!(TemplateValue::Number(-7.0).render(), "-7");
    }

    #[test]
    fn test_get_path() {
        let mut inner = HashMap::new();
        inner.insert("title".to_string(), TemplateValue::String("Hello".into()));
        let value = TemplateValue::Map(inner);

        assert_eq!(
            value.get_path(&["title"]),
            Some(&TemplateValue::String("Hello".into()))
        );
        assert_eq!(value.get_path(&["missing"]), None);
    }

    #[test]
    fn test_context_scoping() {
        let mut parent = TemplateContext::new();
        parent.insert("x", TemplateValue::String("outer".into()));
        parent.insert("y", TemplateValue::String("kept".into()));

        let mut child = parent.child();
        child.insert("x", TemplateValue::String("inner".into()));

        assert_eq!(child.get("x"), Some(&TemplateValue::String("inner".into())));
        assert_eq!(child.get("y"), Some(&TemplateValue::String("kept".into())));
        assert_eq!(
            parent.get("x"),
            Some(&TemplateValue::String("outer".into()))
        );
    }

    #[test]
    fn test_from_json() {
        let value = TemplateValue::from_json(&serde_json::json!({
            "title": "T",
            "count": 2,
            "tags": ["a", "b"]
        }));
        assert_eq!(
            value.get_path(&["title"]),
            Some(&TemplateValue::String("T".into()))
        );
        assert_eq!(value.get_path(&["count"]), Some(&TemplateValue::Number(2.0)));
        assert_eq!(
            value.get_path(&["tags"]).and_then(TemplateValue::length),
            Some(2)
        );
    }
}
