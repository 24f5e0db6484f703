//! Submitted form values
//!
//! Shape mirrors the schema: `{ section_key: { field_name: value } }`. Keys are
//! stored sorted, so nothing downstream can depend on entry order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Map<String, Value>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `section`, if any
    pub fn section(&self, section: &str) -> Option<&Value> {
        self.0.get(section)
    }

    /// Value of one field, if its section is an object holding it
    pub fn field(&self, section: &str, field: &str) -> Option<&Value> {
        self.0.get(section)?.as_object()?.get(field)
    }

    /// Set one field, creating (or replacing a non-object) section as needed
    pub fn set(&mut self, section: &str, field: &str, value: impl Into<Value>) {
        let entry = self
            .0
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(field.to_string(), value.into());
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for FormData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
