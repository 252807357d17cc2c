//! Record types for fetched result rows.

use crate::{error::Result, Config, Error, FieldValue};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One fetched record: an ordered mapping from field name to value.
///
/// Iteration order is the order the fields arrived in, which is the order
/// columns are assigned during schema discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style method to append a field.
    ///
    /// An existing field with the same name is replaced in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, replacing the value of an existing field of that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Build a record from a JSON object map, keeping its key order.
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>, config: &Config) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| (k, FieldValue::from_json(v, config)))
            .collect();
        Self { fields }
    }

    /// Build a record from a JSON value, which must be an object.
    pub fn from_json(value: serde_json::Value, config: &Config) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(Self::from_map(map, config)),
            other => Err(Error::InvalidRecord(format!(
                "expected object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Check if a field is present (including null-valued ones).
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Iterate over fields in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Parse a fetched result set.
///
/// Accepts either a bare array of record objects or a list response of the
/// form `{"records": [...], "offset": "..."}`.
pub fn records_from_json(value: serde_json::Value, config: &Config) -> Result<Vec<Record>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut response) => match response.remove("records") {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::InvalidRecord(format!(
                    "\"records\" must be an array, got {}",
                    json_type_name(&other)
                )))
            }
            None => {
                return Err(Error::InvalidRecord(
                    "list response has no \"records\" field".into(),
                ))
            }
        },
        other => {
            return Err(Error::InvalidRecord(format!(
                "expected array or list response, got {}",
                json_type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(|item| Record::from_json(item, config))
        .collect()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
