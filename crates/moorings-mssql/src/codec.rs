//! Bidirectional value conversion.
//!
//! `encode` renders native values as quoted literals on the way into a
//! statement; `decode` coerces raw driver cells back into typed values
//! using the column's declared type. Both directions are best-effort by
//! contract: a cell that will not parse is dropped from the decoded
//! record rather than failing the row.

use crate::escape::SqlLiteral;
use moorings_core::{AttributeSchema, AttributeType, Column, SqlValue};
use serde_json::{Map, Value};

/// Render a native value as a literal.
///
/// Scalars are quoted as text — the dialect converts on comparison —
/// and datetimes use the fixed `YYYY-MM-DD HH:MM:SS` UTC form rather
/// than the engine's locale-dependent default. Containers serialize to
/// a JSON string literal; `serde_json::Value` cannot fail to serialize,
/// so the record layer's old fall-through on serialization failure has
/// no remaining failure path here.
pub fn encode(value: &SqlValue) -> SqlLiteral {
    match value {
        SqlValue::Null => SqlLiteral::null(),
        SqlValue::Bool(b) => SqlLiteral::quote(if *b { "true" } else { "false" }),
        SqlValue::Int(i) => SqlLiteral::quote(&i.to_string()),
        SqlValue::Float(f) => SqlLiteral::quote(&f.to_string()),
        SqlValue::Text(s) => SqlLiteral::quote(s),
        SqlValue::DateTime(dt) => {
            SqlLiteral::quote(&dt.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        SqlValue::Json(container) => SqlLiteral::quote(&container.to_string()),
    }
}

/// Coerce one raw cell using the column's declared type.
///
/// `None` means the cell could not be coerced and the field should be
/// dropped from the decoded record.
pub fn decode(kind: AttributeType, raw: &Value) -> Option<Value> {
    match kind {
        AttributeType::Array | AttributeType::Json => match raw {
            Value::String(text) => serde_json::from_str(text).ok(),
            other => Some(other.clone()),
        },
        AttributeType::Boolean => match raw {
            Value::Number(n) if n.as_i64() == Some(0) => Some(Value::Bool(false)),
            Value::Number(n) if n.as_i64() == Some(1) => Some(Value::Bool(true)),
            other => Some(other.clone()),
        },
        _ => Some(raw.clone()),
    }
}

/// Decode a named record.
///
/// Columns missing from the schema pass through untouched; a cell that
/// fails to coerce is dropped while the rest of the record survives.
pub fn decode_record(schema: &AttributeSchema, record: &Map<String, Value>) -> Map<String, Value> {
    let mut decoded = Map::new();
    for (name, raw) in record {
        match schema.get(name) {
            Some(attribute) => {
                if let Some(value) = decode(attribute.kind, raw) {
                    decoded.insert(name.clone(), value);
                }
            }
            None => {
                decoded.insert(name.clone(), raw.clone());
            }
        }
    }
    decoded
}

/// Decode one positional row using the driver's column metadata.
pub fn decode_row(
    schema: &AttributeSchema,
    columns: &[Column],
    cells: &[Value],
) -> Map<String, Value> {
    let mut record = Map::new();
    for (column, cell) in columns.iter().zip(cells) {
        record.insert(column.name.clone(), cell.clone());
    }
    decode_record(schema, &record)
}
