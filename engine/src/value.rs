//! Tagged field values and their type tags.
//!
//! Upstream records are schemaless, so every field carries its own runtime
//! type. [`FieldValue`] is the sum type over everything the upstream API can
//! return, and [`ValueType`] is the tag recorded in the column schema.

use crate::{Config, Record};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag observed for a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Null or absent; nothing to infer from
    Unknown,
    Boolean,
    Integer,
    Float,
    String,
    Date,
    /// Time of day without a date
    Time,
    Timestamp,
    List,
    /// Nested mapping held opaquely in a single column
    Map,
}

impl ValueType {
    /// Relational type name reported through result metadata.
    pub fn sql_type_name(self) -> &'static str {
        match self {
            ValueType::Unknown => "NULL",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Integer => "BIGINT",
            ValueType::Float => "DOUBLE",
            ValueType::String => "VARCHAR",
            ValueType::Date => "DATE",
            ValueType::Time => "TIME",
            ValueType::Timestamp => "TIMESTAMP",
            ValueType::List => "ARRAY",
            ValueType::Map => "JAVA_OBJECT",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Unknown => write!(f, "Unknown"),
            ValueType::Boolean => write!(f, "Boolean"),
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Float => write!(f, "Float"),
            ValueType::String => write!(f, "String"),
            ValueType::Date => write!(f, "Date"),
            ValueType::Time => write!(f, "Time"),
            ValueType::Timestamp => write!(f, "Timestamp"),
            ValueType::List => write!(f, "List"),
            ValueType::Map => write!(f, "Map"),
        }
    }
}

/// A dynamically-typed field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    List(Vec<FieldValue>),
    Map(Record),
}

impl FieldValue {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Null => ValueType::Unknown,
            FieldValue::Bool(_) => ValueType::Boolean,
            FieldValue::Int(_) => ValueType::Integer,
            FieldValue::Float(_) => ValueType::Float,
            FieldValue::Text(_) => ValueType::String,
            FieldValue::Date(_) => ValueType::Date,
            FieldValue::Time(_) => ValueType::Time,
            FieldValue::Timestamp(_) => ValueType::Timestamp,
            FieldValue::List(_) => ValueType::List,
            FieldValue::Map(_) => ValueType::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Borrow the nested mapping, if this is one.
    pub fn as_map(&self) -> Option<&Record> {
        match self {
            FieldValue::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Convert a JSON value.
    ///
    /// Integers that fit `i64` become [`FieldValue::Int`], every other number
    /// becomes [`FieldValue::Float`]. Strings stay text unless
    /// `config.detect_temporal` is set and they parse as a date or timestamp.
    pub fn from_json(value: serde_json::Value, config: &Config) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) if config.detect_temporal => {
                parse_temporal(&s).unwrap_or(FieldValue::Text(s))
            }
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|item| FieldValue::from_json(item, config))
                    .collect(),
            ),
            serde_json::Value::Object(map) => FieldValue::Map(Record::from_map(map, config)),
        }
    }
}

fn parse_temporal(s: &str) -> Option<FieldValue> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(FieldValue::Timestamp(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(FieldValue::Date(date));
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .ok()
        .map(FieldValue::Time)
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::Time(t) => write!(f, "{}", t),
            FieldValue::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            FieldValue::List(_) | FieldValue::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        FieldValue::Time(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Map(value)
    }
}

/// Extraction of a concrete Rust type from a [`FieldValue`].
///
/// Matching is by tag: an integer is never read as a float, text is never
/// parsed. Narrow integer targets additionally require the value to fit.
pub trait FromFieldValue: Sized {
    /// Name reported as the expected type in mismatch errors.
    ///
    /// Uses the [`ValueType`] display names, qualified with a width where the
    /// target is narrower than the stored value.
    const TYPE_NAME: &'static str;

    /// Returns `None` when the value's tag or range does not fit `Self`.
    fn from_field(value: &FieldValue) -> Option<Self>;
}

impl FromFieldValue for bool {
    const TYPE_NAME: &'static str = "Boolean";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

macro_rules! impl_from_field_int {
    ($($ty:ty => $name:literal),*) => {
        $(
            impl FromFieldValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_field(value: &FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Int(i) => <$ty>::try_from(*i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_field_int!(
    i8 => "Integer (8-bit)",
    i16 => "Integer (16-bit)",
    i32 => "Integer (32-bit)",
    i64 => "Integer"
);

impl FromFieldValue for f64 {
    const TYPE_NAME: &'static str = "Float";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromFieldValue for f32 {
    const TYPE_NAME: &'static str = "Float (32-bit)";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) if v.is_finite() && v.abs() > f32::MAX as f64 => None,
            FieldValue::Float(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl FromFieldValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for NaiveDate {
    const TYPE_NAME: &'static str = "Date";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl FromFieldValue for NaiveTime {
    const TYPE_NAME: &'static str = "Time";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl FromFieldValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "Timestamp";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl FromFieldValue for Vec<FieldValue> {
    const TYPE_NAME: &'static str = "List";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for Record {
    const TYPE_NAME: &'static str = "Map";

    fn from_field(value: &FieldValue) -> Option<Self> {
        value.as_map().cloned()
    }
}
