//! Attribute values exchanged with forms and the management model

use serde_json::{json, Map};

/// A single attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(i64),
    Bool(bool),
    List(Vec<String>),
    Properties(Vec<(String, String)>),
    Undefined,
}

impl Value {
    /// Management-model representation
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => json!(s),
            Value::Number(n) => json!(n),
            Value::Bool(b) => json!(b),
            Value::List(items) => json!(items),
            Value::Properties(pairs) => {
                let map: Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect();
                serde_json::Value::Object(map)
            }
            Value::Undefined => serde_json::Value::Null,
        }
    }

    /// Whether a value read from the management model equals this one.
    ///
    /// The model returns expressions and some numeric types as strings, so
    /// numbers and booleans also match their string form.
    pub fn matches(&self, actual: &serde_json::Value) -> bool {
        match (self, actual) {
            (Value::Undefined, serde_json::Value::Null) => true,
            (Value::Undefined, _) => false,
            (Value::Text(expected), serde_json::Value::String(s)) => expected == s,
            (Value::Text(expected), other) => other.to_string() == *expected,
            (Value::Number(expected), serde_json::Value::Number(n)) => n.as_i64() == Some(*expected),
            (Value::Number(expected), serde_json::Value::String(s)) => {
                s.trim().parse::<i64>().ok() == Some(*expected)
            }
            (Value::Bool(expected), serde_json::Value::Bool(b)) => expected == b,
            (Value::Bool(expected), serde_json::Value::String(s)) => {
                s.parse::<bool>().ok() == Some(*expected)
            }
            (Value::List(expected), serde_json::Value::Array(items)) => {
                expected.len() == items.len()
                    && expected
                        .iter()
                        .zip(items)
                        .all(|(e, a)| Value::Text(e.clone()).matches(a))
            }
            (Value::Properties(expected), serde_json::Value::Object(map)) => {
                expected.len() == map.len()
                    && expected.iter().all(|(k, v)| {
                        map.get(k)
                            .map_or(false, |a| Value::Text(v.clone()).matches(a))
                    })
            }
            _ => false,
        }
    }

    /// Value of a management-model node. Fractional numbers become text.
    pub fn from_json(json: &serde_json::Value) -> Self {
        fn text(json: &serde_json::Value) -> String {
            match json {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        }

        match json {
            serde_json::Value::Null => Value::Undefined,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(n) => Value::Number(n),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(text).collect()),
            serde_json::Value::Object(map) => {
                Value::Properties(map.iter().map(|(k, v)| (k.clone(), text(v))).collect())
            }
        }
    }

    /// Text shown by a read-only form field for this value
    pub fn display_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => items.join(", "),
            Value::Properties(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
            Value::Undefined => String::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(String::from).collect())
    }
}

/// Ordered attribute values for `add` operations and operation headers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::empty().and(name, value)
    }

    /// Adds or replaces an entry
    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_matches_string_form() {
        assert!(Value::Number(10).matches(&json!(10)));
        assert!(Value::Number(10).matches(&json!("10")));
        assert!(!Value::Number(10).matches(&json!(11)));
        assert!(!Value::Number(10).matches(&json!("ten")));
    }

    #[test]
    fn test_undefined_matches_null_only() {
        assert!(Value::Undefined.matches(&serde_json::Value::Null));
        assert!(!Value::Undefined.matches(&json!("")));
    }

    #[test]
    fn test_list_matches_in_order() {
        let expected = Value::from(vec!["a", "b"]);
        assert!(expected.matches(&json!(["a", "b"])));
        assert!(!expected.matches(&json!(["b", "a"])));
        assert!(!expected.matches(&json!(["a"])));
    }

    #[test]
    fn test_properties_to_json() {
        let props = Value::Properties(vec![("k1".into(), "v1".into()), ("k2".into(), "v2".into())]);
        assert_eq!(props.to_json(), json!({"k1": "v1", "k2": "v2"}));
        assert!(props.matches(&json!({"k2": "v2", "k1": "v1"})));
    }

    #[test]
    fn test_values_replace_existing() {
        let values = Values::of("max-threads", 10).and("name", "tp").and("max-threads", 20);
        assert_eq!(values.get("max-threads"), Some(&Value::Number(20)));
        assert_eq!(values.iter().count(), 2);
    }

    #[test]
    fn test_from_json_matches_source() {
        for node in [
            json!(null),
            json!(true),
            json!(42),
            json!(0.75),
            json!("ASYNC"),
            json!(["a", 1]),
            json!({"k1": "v1", "k2": 2}),
        ] {
            assert!(Value::from_json(&node).matches(&node), "{node}");
        }
        assert_eq!(Value::from_json(&json!(42)), Value::Number(42));
        assert_eq!(Value::from_json(&json!(null)), Value::Undefined);
        assert!(!Value::from_json(&json!({"k1": "v1"})).matches(&json!({"k1": "v1", "k2": "v2"})));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::from(vec!["a", "b"]).display_text(), "a, b");
        assert_eq!(Value::Bool(true).display_text(), "true");
    }
}
