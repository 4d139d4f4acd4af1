//! The input value tree.
//!
//! Field values can be any shape, so the engine works on a small tagged
//! union instead of a typed schema. Mappings keep insertion order because
//! field order is observable through `Validator::fails`.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered string-keyed mapping of values.
pub type Mapping = IndexMap<String, Value>;

/// A single node in the input data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Short name of the variant, for logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Sequences and mappings are containers; everything else is a scalar.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Element count for containers, `None` for scalars.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Value::Sequence(items) => Some(items.len()),
            Value::Mapping(map) => Some(map.len()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The scalar's text form.
    ///
    /// `Null` and `false` render as the empty string, `true` as `"1"`,
    /// numbers in their shortest decimal form. Containers have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null | Value::Bool(false) => Some(Cow::Borrowed("")),
            Value::Bool(true) => Some(Cow::Borrowed("1")),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    /// Look up one path segment inside a container.
    ///
    /// Mappings are keyed by the segment; sequences accept a decimal index.
    pub fn child(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(segment),
            Value::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str(self.type_name()),
            },
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

/// Convert a JSON object into a top-level `Mapping`.
///
/// Non-object JSON yields `None`: top-level input must be keyed by field.
pub fn mapping_from_json(value: serde_json::Value) -> Option<Mapping> {
    match Value::from(value) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_shape() {
        let value = Value::from(json!({
            "name": "Ada",
            "age": 36,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "address": { "city": "London" },
            "nothing": null
        }));

        let map = match value {
            Value::Mapping(map) => map,
            other => panic!("expected mapping, got {:?}", other),
        };
        assert_eq!(map["name"], Value::from("Ada"));
        assert_eq!(map["age"], Value::Int(36));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["tags"].element_count(), Some(2));
        assert!(map["address"].is_container());
        assert!(map["nothing"].is_null());
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Null.as_text().unwrap(), "");
        assert_eq!(Value::Bool(true).as_text().unwrap(), "1");
        assert_eq!(Value::Bool(false).as_text().unwrap(), "");
        assert_eq!(Value::Int(-4).as_text().unwrap(), "-4");
        assert_eq!(Value::Float(2.0).as_text().unwrap(), "2");
        assert_eq!(Value::Float(2.5).as_text().unwrap(), "2.5");
        assert!(Value::Sequence(vec![]).as_text().is_none());
    }

    #[test]
    fn test_child_lookup() {
        let value = Value::from(json!({ "items": [{ "sku": "A1" }] }));
        let items = value.child("items").unwrap();
        assert_eq!(items.child("0").and_then(|v| v.child("sku")), Some(&Value::from("A1")));
        assert!(items.child("1").is_none());
        assert!(items.child("first").is_none());
        assert!(Value::from("scalar").child("x").is_none());
    }

    #[test]
    fn test_deserialize_yaml_keeps_order() {
        let map: Mapping = serde_yaml::from_str("zeta: 1\nalpha: two\nmid: 3.5\n").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map["alpha"], Value::from("two"));
        assert_eq!(map["mid"], Value::Float(3.5));
    }

    #[test]
    fn test_mapping_from_json_rejects_non_objects() {
        assert!(mapping_from_json(json!([1, 2])).is_none());
        assert!(mapping_from_json(json!({ "a": 1 })).is_some());
    }
}
