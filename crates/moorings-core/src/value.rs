//! Typed native values on their way into a statement.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A native value handed to a dialect codec.
///
/// The record layer produces these from user input; the codec renders
/// them as literal text. JSON containers keep their structure until
/// encode time so the codec serializes them exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// A list or keyed map; becomes a JSON string literal on encode.
    Json(Value),
}

impl SqlValue {
    /// True for the SQL null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Float(f)
                } else {
                    SqlValue::Text(n.to_string())
                }
            }
            Value::String(s) => SqlValue::Text(s),
            container => SqlValue::Json(container),
        }
    }
}

/// Convert a JSON record into ordered column/value pairs.
///
/// Returns `None` when the value is not an object.
pub fn record_values(record: &Value) -> Option<Vec<(String, SqlValue)>> {
    let Value::Object(entries) = record else {
        return None;
    };
    Some(
        entries
            .iter()
            .map(|(column, value)| (column.clone(), SqlValue::from(value.clone())))
            .collect(),
    )
}
