//! Schema normalization from INFORMATION_SCHEMA rows.
//!
//! The introspection statements in [`crate::statement`] produce two row
//! shapes: one per column and one per constrained column. This module
//! joins them into the canonical [`AttributeSchema`] the codec and
//! statement builder read.

use moorings_core::{Attribute, AttributeSchema, AttributeType};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One row of the column introspection result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl ColumnRow {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            default_value: None,
        }
    }
}

/// One row of the constraint introspection result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConstraintRow {
    pub column: String,
    pub constraint: String,
}

impl ConstraintRow {
    pub fn new(column: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            constraint: constraint.into(),
        }
    }
}

/// Join introspected rows into an attribute schema.
///
/// Each column row becomes an attribute in introspection order. A
/// `PRIMARY KEY` constraint row sets `primary_key`, a `UNIQUE` row sets
/// `unique`, and either marks the column `indexed`; several constraint
/// rows for one column accumulate. Columns without a constraint row get
/// no flags.
pub fn normalize_schema(columns: &[ColumnRow], constraints: &[ConstraintRow]) -> AttributeSchema {
    let mut schema = AttributeSchema::new();
    for column in columns {
        let mut attribute = Attribute::of(attribute_type(&column.data_type));
        attribute.default_value = column.default_value.clone();
        for row in constraints.iter().filter(|row| row.column == column.name) {
            match row.constraint.as_str() {
                "PRIMARY KEY" => attribute.primary_key = true,
                "UNIQUE" => attribute.unique = true,
                _ => continue,
            }
            attribute.indexed = true;
        }
        schema.insert(column.name.clone(), attribute);
    }
    schema
}

/// Map a reported data type to a declared attribute type.
///
/// Length suffixes (`varchar(255)`, `nvarchar(max)`) are stripped before
/// matching. Unrecognized types land on `String`, the widest column.
fn attribute_type(data_type: &str) -> AttributeType {
    let base = data_type
        .split('(')
        .next()
        .unwrap_or(data_type)
        .trim()
        .to_ascii_lowercase();
    match base.as_str() {
        "char" | "varchar" | "nchar" | "nvarchar" | "text" | "ntext" => AttributeType::String,
        "bit" => AttributeType::Boolean,
        "int" | "integer" | "bigint" | "smallint" | "tinyint" => AttributeType::Integer,
        "float" | "real" | "decimal" | "numeric" | "money" | "smallmoney" => AttributeType::Float,
        "date" => AttributeType::Date,
        "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => AttributeType::DateTime,
        other => {
            warn!(data_type = other, "unrecognized column type, treating as string");
            AttributeType::String
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_primary_key_row_sets_key_and_indexed() {
        let schema = normalize_schema(
            &[ColumnRow::new("id", "int"), ColumnRow::new("name", "nvarchar(max)")],
            &[ConstraintRow::new("id", "PRIMARY KEY")],
        );

        let id = schema.get("id").unwrap();
        assert!(id.primary_key);
        assert!(id.indexed);
        assert!(!id.unique);

        let name = schema.get("name").unwrap();
        assert!(!name.primary_key);
        assert!(!name.indexed);
        assert!(!name.unique);
    }

    #[test]
    fn test_unique_row_sets_unique_and_indexed() {
        let schema = normalize_schema(
            &[ColumnRow::new("email", "nvarchar(255)")],
            &[ConstraintRow::new("email", "UNIQUE")],
        );

        let email = schema.get("email").unwrap();
        assert!(email.unique);
        assert!(email.indexed);
        assert!(!email.primary_key);
    }

    #[test]
    fn test_multiple_constraint_rows_accumulate() {
        let schema = normalize_schema(
            &[ColumnRow::new("code", "int")],
            &[
                ConstraintRow::new("code", "PRIMARY KEY"),
                ConstraintRow::new("code", "UNIQUE"),
            ],
        );

        let code = schema.get("code").unwrap();
        assert!(code.primary_key);
        assert!(code.unique);
        assert!(code.indexed);
    }

    #[test]
    fn test_foreign_key_rows_only_mark_indexed_flags_nothing() {
        let schema = normalize_schema(
            &[ColumnRow::new("owner", "int")],
            &[ConstraintRow::new("owner", "FOREIGN KEY")],
        );

        let owner = schema.get("owner").unwrap();
        assert!(!owner.primary_key);
        assert!(!owner.unique);
        assert!(!owner.indexed);
    }

    #[test_case("nvarchar(max)", AttributeType::String; "nvarchar")]
    #[test_case("varchar(255)", AttributeType::String; "varchar with length")]
    #[test_case("bit", AttributeType::Boolean; "bit")]
    #[test_case("bigint", AttributeType::Integer; "bigint")]
    #[test_case("decimal(10, 2)", AttributeType::Float; "decimal")]
    #[test_case("date", AttributeType::Date; "date")]
    #[test_case("datetime2", AttributeType::DateTime; "datetime2")]
    #[test_case("DATETIME", AttributeType::DateTime; "case insensitive")]
    #[test_case("geography", AttributeType::String; "unknown falls back to string")]
    fn test_data_type_mapping(reported: &str, expected: AttributeType) {
        let schema = normalize_schema(&[ColumnRow::new("c", reported)], &[]);
        assert_eq!(schema.get("c").unwrap().kind, expected);
    }

    #[test]
    fn test_default_value_is_carried_verbatim() {
        let mut column = ColumnRow::new("active", "bit");
        column.default_value = Some(json!("((1))"));
        let schema = normalize_schema(&[column], &[]);

        assert_eq!(
            schema.get("active").unwrap().default_value,
            Some(json!("((1))"))
        );
    }

    #[test]
    fn test_columns_keep_introspection_order() {
        let schema = normalize_schema(
            &[
                ColumnRow::new("b", "int"),
                ColumnRow::new("a", "int"),
                ColumnRow::new("c", "int"),
            ],
            &[],
        );

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
