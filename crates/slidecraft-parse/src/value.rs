//! Conversion from parsed YAML nodes to `serde_json` values.
//!
//! The rest of the pipeline (schema validation, template contexts) operates
//! on `serde_json::Value`; YAML is only the surface syntax.

use serde_json::{Map, Number, Value};
use yaml_rust2::Yaml;

/// Convert a YAML node into a `serde_json::Value`.
///
/// Real values that cannot be represented as JSON numbers (NaN, infinities)
/// keep their source text as a string. Aliases and bad values become null;
/// non-scalar mapping keys are dropped.
pub fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(i) => Value::Number(Number::from(*i)),
        Yaml::Real(text) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.clone())),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(entries) => {
            let mut map = Map::new();
            for (key, value) in entries.iter() {
                if let Some(key) = scalar_key(key) {
                    map.insert(key, yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
    }
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Real(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yaml_rust2::YamlLoader;

    fn convert(text: &str) -> Value {
        let docs = YamlLoader::load_from_str(text).expect("valid yaml");
        docs.first().map(yaml_to_json).unwrap_or(Value::Null)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(convert("42"), json!(42));
        assert_eq!(convert("4.5"), json!(4.5));
        assert_eq!(convert("true"), json!(true));
        assert_eq!(convert("hello"), json!("hello"));
        assert_eq!(convert("~"), Value::Null);
    }

    #[test]
    fn test_nested_structures() {
        let value = convert("points:\n  - one\n  - two\nmeta:\n  depth: 2\n");
        assert_eq!(
            value,
            json!({"points": ["one", "two"], "meta": {"depth": 2}})
        );
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = convert("1: first\ntrue: second\n");
        assert_eq!(value, json!({"1": "first", "true": "second"}));
    }
}
