// Content validation engine

use crate::error::{FieldError, Validation};
use crate::schema::{ArraySchema, NumberSchema, ObjectSchema, Schema, StringSchema};
use serde_json::Value;

impl Schema {
    /// Validate a value against this schema, collecting every failure.
    ///
    /// A value with no failures yields `valid: true, errors: []`.
    pub fn validate(&self, value: &Value) -> Validation {
        let mut context = ValidationContext::new();
        validate_value(value, self, &mut context);
        context.finish()
    }
}

/// Validation context tracks the dotted path during traversal.
struct ValidationContext {
    path: Vec<String>,
    errors: Vec<FieldError>,
}

impl ValidationContext {
    fn new() -> Self {
        Self {
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Execute a function with an extra path segment pushed.
    fn with_segment<F>(&mut self, segment: String, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.path.push(segment);
        f(self);
        self.path.pop();
    }

    /// Record a failure at the current path.
    fn add_error(&mut self, message: impl Into<String>) {
        self.errors
            .push(FieldError::new(self.path.join("."), message));
    }

    /// Record a failure one segment below the current path. Used for
    /// required fields, whose value node does not exist.
    fn add_error_at(&mut self, segment: &str, message: impl Into<String>) {
        self.path.push(segment.to_string());
        let path = self.path.join(".");
        self.path.pop();
        self.errors.push(FieldError::new(path, message));
    }

    fn finish(self) -> Validation {
        if self.errors.is_empty() {
            Validation::ok()
        } else {
            Validation::fail(self.errors)
        }
    }
}

/// The JSON type name used in mismatch messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Main validation dispatcher.
fn validate_value(value: &Value, schema: &Schema, context: &mut ValidationContext) {
    match schema {
        Schema::Any => {}
        Schema::Boolean => {
            if !value.is_boolean() {
                context.add_error(format!("expected boolean, got {}", type_name(value)));
            }
        }
        Schema::Number(s) => validate_number(value, s, context),
        Schema::String(s) => validate_string(value, s, context),
        Schema::Array(s) => validate_array(value, s, context),
        Schema::Object(s) => validate_object(value, s, context),
        Schema::OneOf(members) => validate_one_of(value, members, context),
    }
}

fn validate_number(value: &Value, schema: &NumberSchema, context: &mut ValidationContext) {
    let Value::Number(n) = value else {
        let expected = if schema.integer { "integer" } else { "number" };
        context.add_error(format!("expected {expected}, got {}", type_name(value)));
        return;
    };
    if schema.integer && !n.is_i64() && !n.is_u64() {
        context.add_error("expected integer, got fractional number");
    }
}

fn validate_string(value: &Value, schema: &StringSchema, context: &mut ValidationContext) {
    let Value::String(s) = value else {
        context.add_error(format!("expected string, got {}", type_name(value)));
        return;
    };

    // enum validates membership only; pattern applies otherwise.
    if let Some(allowed) = &schema.allowed {
        if !allowed.iter().any(|v| v == value) {
            let rendered = allowed
                .iter()
                .map(display_value)
                .collect::<Vec<_>>()
                .join(", ");
            context.add_error(format!("value must be one of: {rendered}"));
        }
        return;
    }

    if let Some(pattern) = &schema.pattern {
        if !pattern.is_match(s) {
            context.add_error(format!(
                "value does not match pattern \"{}\"",
                pattern.as_str()
            ));
        }
    }
}

fn validate_array(value: &Value, schema: &ArraySchema, context: &mut ValidationContext) {
    let Value::Array(items) = value else {
        context.add_error(format!("expected array, got {}", type_name(value)));
        return;
    };

    if let Some(min) = schema.min_items {
        if items.len() < min {
            context.add_error(format!(
                "expected at least {min} items, got {}",
                items.len()
            ));
        }
    }
    if let Some(max) = schema.max_items {
        if items.len() > max {
            context.add_error(format!("expected at most {max} items, got {}", items.len()));
        }
    }

    if let Some(item_schema) = &schema.items {
        for (index, item) in items.iter().enumerate() {
            context.with_segment(index.to_string(), |ctx| {
                validate_value(item, item_schema, ctx);
            });
        }
    }
}

fn validate_object(value: &Value, schema: &ObjectSchema, context: &mut ValidationContext) {
    let Value::Object(map) = value else {
        context.add_error(format!("expected object, got {}", type_name(value)));
        return;
    };

    for name in &schema.required {
        if !map.contains_key(name) {
            context.add_error_at(name, format!("missing required field \"{name}\""));
        }
    }

    // Declared properties are checked; undeclared keys always pass through.
    for (key, property_schema) in &schema.properties {
        if let Some(property_value) = map.get(key) {
            context.with_segment(key.clone(), |ctx| {
                validate_value(property_value, property_schema, ctx);
            });
        }
    }
}

fn validate_one_of(value: &Value, members: &[Schema], context: &mut ValidationContext) {
    for member in members {
        if member.validate(value).valid {
            return;
        }
    }
    context.add_error("value does not match any allowed variant");
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::compile;
    use serde_json::json;

    fn schema(decl: serde_json::Value) -> Schema {
        compile(&decl).expect("schema should compile")
    }

    #[test]
    fn test_valid_yields_no_errors() {
        let s = schema(json!({"type": "string"}));
        let outcome = s.validate(&json!("hello"));
        assert!(outcome.valid);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_type_mismatch_message() {
        let s = schema(json!({"type": "string"}));
        let outcome = s.validate(&json!(42));
        assert!(!outcome.valid);
        assert_eq!(outcome.errors[0].to_string(), "expected string, got number");
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let s = schema(json!({"type": "integer"}));
        assert!(s.validate(&json!(3)).valid);
        let outcome = s.validate(&json!(3.5));
        assert_eq!(
            outcome.errors[0].message,
            "expected integer, got fractional number"
        );
    }

    #[test]
    fn test_number_accepts_fraction() {
        let s = schema(json!({"type": "number"}));
        assert!(s.validate(&json!(3.5)).valid);
    }

    #[test]
    fn test_enum_membership() {
        let s = schema(json!({"type": "string", "enum": ["left", "right"]}));
        assert!(s.validate(&json!("left")).valid);
        let outcome = s.validate(&json!("center"));
        assert_eq!(
            outcome.errors[0].message,
            "value must be one of: left, right"
        );
    }

    #[test]
    fn test_pattern_match() {
        let s = schema(json!({"type": "string", "pattern": "^#[0-9a-f]{6}$"}));
        assert!(s.validate(&json!("#a1b2c3")).valid);
        assert!(!s.validate(&json!("red")).valid);
    }

    #[test]
    fn test_array_items_and_bounds() {
        let s = schema(json!({
            "type": "array",
            "items": {"type": "string"},
            "minItems": 1,
            "maxItems": 3
        }));
        assert!(s.validate(&json!(["a", "b"])).valid);

        let outcome = s.validate(&json!([])).errors;
        assert_eq!(outcome[0].message, "expected at least 1 items, got 0");

        let outcome = s.validate(&json!(["a", 2, "c"]));
        assert_eq!(outcome.errors[0].to_string(), "1: expected string, got number");
    }

    #[test]
    fn test_array_without_items_accepts_anything() {
        let s = schema(json!({"type": "array"}));
        assert!(s.validate(&json!(["a", 2, {"k": true}])).valid);
    }

    #[test]
    fn test_required_error_names_field() {
        let s = schema(json!({
            "type": "object",
            "required": ["title"],
            "properties": {"title": {"type": "string"}}
        }));
        let outcome = s.validate(&json!({}));
        assert!(!outcome.valid);
        assert_eq!(outcome.errors[0].path, "title");
        assert!(outcome.errors[0].message.contains("title"));
    }

    #[test]
    fn test_undeclared_keys_pass_through() {
        let s = schema(json!({
            "type": "object",
            "properties": {"title": {"type": "string"}}
        }));
        let outcome = s.validate(&json!({"title": "ok", "surprise": [1, 2, 3]}));
        assert!(outcome.valid);
    }

    #[test]
    fn test_object_without_properties_accepts_any_map() {
        let s = schema(json!({"type": "object"}));
        assert!(s.validate(&json!({"anything": {"nested": true}})).valid);
        assert!(!s.validate(&json!("not a map")).valid);
    }

    #[test]
    fn test_nested_path_rendering() {
        let s = schema(json!({
            "type": "object",
            "properties": {
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["heading"],
                        "properties": {"heading": {"type": "string"}}
                    }
                }
            }
        }));
        let outcome = s.validate(&json!({"sections": [{"heading": "a"}, {}]}));
        assert_eq!(
            outcome.errors[0].to_string(),
            "sections.1.heading: missing required field \"heading\""
        );
    }

    #[test]
    fn test_one_of_accepts_either() {
        let s = schema(json!({"oneOf": [{"type": "string"}, {"type": "number"}]}));
        assert!(s.validate(&json!("text")).valid);
        assert!(s.validate(&json!(7)).valid);
        let outcome = s.validate(&json!(true));
        assert_eq!(
            outcome.errors[0].message,
            "value does not match any allowed variant"
        );
    }
}
