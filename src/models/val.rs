//! Values are used for unit properties and catalog setting descriptors.  This module
//! provides facilities for serialization, organization and comparison of these values.

use serde::Deserialize;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Value {
    // Provides a display-friendly representation of the value,
    // truncated if necessary.
    pub fn tag(&self, max_len: usize) -> String {
        match self {
            Value::String(s) => {
                if s.chars().count() > max_len {
                    format!("{}...", s.chars().take(max_len).collect::<String>())
                } else {
                    s.clone()
                }
            },
            Value::Int(i) => format!("{}", i),
            Value::Bool(b) => format!("{}", b),
        }
    }

    #[cfg(test)]
    pub fn string_equals(&self, s: &str) -> bool {
        match self {
            Value::String(s2) => s == s2,
            _ => panic!("Cannot compare non-string value to string"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
        }
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

/// A property set is an insertion-ordered key-value collection of values.  Order
/// matters here since properties are written out in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct PropertySet {
    entries: Vec<(String, Value)>,
}

impl PropertySet {
    pub fn new() -> Self {
        PropertySet { entries: Vec::new() }
    }

    /// Sets a value, replacing any existing value for the key in place
    pub fn add_value(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tag(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.tag(10)))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

// Catalog files may carry nested JSON for settings payloads; anything that isn't
// a scalar is kept as its compact JSON text.
impl From<serde_json::Map<String, serde_json::Value>> for PropertySet {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut set = PropertySet::new();
        for (k, v) in map {
            let value = match v {
                serde_json::Value::Bool(b) => Value::Bool(b),
                serde_json::Value::String(s) => Value::String(s),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => Value::String(n.to_string()),
                },
                other => Value::String(other.to_string()),
            };
            set.add_value(&k, value);
        }
        set
    }
}
