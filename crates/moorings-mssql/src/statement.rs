//! Full statement assembly for one collection.
//!
//! A [`Statements`] value is bound to a table and its schema and renders
//! complete statements: query heads plus the compiled clause tail, DDL
//! from the schema's type mapping, and the INFORMATION_SCHEMA
//! introspection text whose rows the schema normalizer consumes.

use crate::codec;
use crate::compile;
use crate::error::{CompileError, CompileResult};
use crate::escape::{quote_ident, SqlLiteral};
use moorings_core::{Attribute, AttributeSchema, AttributeType, Criteria, SqlValue};
use tracing::debug;

/// Statement builder bound to one table and its schema.
#[derive(Debug, Clone, Copy)]
pub struct Statements<'a> {
    table: &'a str,
    schema: &'a AttributeSchema,
}

impl<'a> Statements<'a> {
    pub fn new(table: &'a str, schema: &'a AttributeSchema) -> Self {
        Self { table, schema }
    }

    /// SELECT — all columns (optionally `TOP n`) or the aggregate head.
    ///
    /// The presence of any aggregate or grouping key switches the whole
    /// head into aggregate mode; the two modes never mix.
    pub fn select(&self, criteria: &Criteria) -> CompileResult<String> {
        let head = if criteria.is_aggregate() {
            format!(
                "SELECT {} FROM {}",
                compile::aggregate_columns(criteria),
                quote_ident(self.table)
            )
        } else if let Some(limit) = criteria.limit {
            format!("SELECT TOP {limit} * FROM {}", quote_ident(self.table))
        } else {
            format!("SELECT * FROM {}", quote_ident(self.table))
        };
        Ok(join_clauses(head, compile::options_clause(criteria)?))
    }

    /// INSERT with `OUTPUT INSERTED.*`, so generated identity columns
    /// come back in the same round trip.
    pub fn insert(&self, values: &[(String, SqlValue)]) -> CompileResult<String> {
        if values.is_empty() {
            return Err(CompileError::EmptyValues {
                table: self.table.to_string(),
            });
        }
        let columns: Vec<String> = values
            .iter()
            .map(|(column, _)| quote_ident(column))
            .collect();
        let literals: Vec<String> = values
            .iter()
            .map(|(_, value)| codec::encode(value).to_string())
            .collect();
        Ok(format!(
            "INSERT INTO {} ({}) OUTPUT INSERTED.* VALUES ({})",
            quote_ident(self.table),
            columns.join(", "),
            literals.join(", ")
        ))
    }

    /// UPDATE … SET … with the criteria's WHERE clause.
    pub fn update(
        &self,
        criteria: &Criteria,
        values: &[(String, SqlValue)],
    ) -> CompileResult<String> {
        if values.is_empty() {
            return Err(CompileError::EmptyValues {
                table: self.table.to_string(),
            });
        }
        let head = format!(
            "UPDATE {} SET {}",
            quote_ident(self.table),
            compile::set_clause(values)
        );
        let tail = compile::where_clause(criteria)?.unwrap_or_default();
        Ok(join_clauses(head, tail))
    }

    /// DELETE with the criteria's WHERE clause.
    pub fn delete(&self, criteria: &Criteria) -> CompileResult<String> {
        let head = format!("DELETE FROM {}", quote_ident(self.table));
        let tail = compile::where_clause(criteria)?.unwrap_or_default();
        Ok(join_clauses(head, tail))
    }

    /// CREATE TABLE with columns in schema definition order.
    pub fn create_table(&self) -> String {
        let columns: Vec<String> = self
            .schema
            .iter()
            .map(|(name, attribute)| self.column_definition(name, attribute))
            .collect();
        let statement = format!(
            "CREATE TABLE {} ({})",
            quote_ident(self.table),
            columns.join(", ")
        );
        debug!(table = self.table, "assembled CREATE TABLE");
        statement
    }

    /// ALTER TABLE … ADD for one new column.
    pub fn add_column(&self, name: &str, attribute: &Attribute) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            quote_ident(self.table),
            self.column_definition(name, attribute)
        )
    }

    /// ALTER TABLE … DROP COLUMN.
    pub fn drop_column(&self, name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_ident(self.table),
            quote_ident(name)
        )
    }

    /// Column name, data type and default for every column of the table.
    pub fn describe_columns(&self) -> String {
        format!(
            "SELECT COLUMN_NAME, DATA_TYPE, COLUMN_DEFAULT FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = {}",
            SqlLiteral::quote(self.table)
        )
    }

    /// Constraint type per constrained column of the table.
    pub fn describe_constraints(&self) -> String {
        format!(
            "SELECT ccu.COLUMN_NAME, tc.CONSTRAINT_TYPE FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc INNER JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE ccu ON tc.CONSTRAINT_NAME = ccu.CONSTRAINT_NAME WHERE tc.TABLE_NAME = {}",
            SqlLiteral::quote(self.table)
        )
    }

    fn column_definition(&self, name: &str, attribute: &Attribute) -> String {
        let column = quote_ident(name);
        if attribute.primary_key {
            return if attribute.kind == AttributeType::Integer {
                format!(
                    "{column} INT NOT NULL IDENTITY(1,1) CONSTRAINT {} PRIMARY KEY",
                    quote_ident(&format!("PK_{}", self.table))
                )
            } else {
                // No identity for non-integer keys; the record layer
                // supplies their values.
                format!("{column} NVARCHAR(MAX) NOT NULL")
            };
        }
        let sql_type = sql_type(attribute.kind);
        if attribute.unique {
            return format!("{column} {sql_type} NOT NULL UNIQUE");
        }
        format!("{column} {sql_type}")
    }
}

fn join_clauses(head: String, tail: String) -> String {
    if tail.is_empty() {
        head
    } else {
        format!("{head} {tail}")
    }
}

/// Column type for each declared attribute type.
fn sql_type(kind: AttributeType) -> &'static str {
    match kind {
        AttributeType::String
        | AttributeType::Text
        | AttributeType::Array
        | AttributeType::Json => "NVARCHAR(MAX)",
        AttributeType::Boolean => "BIT",
        AttributeType::Integer => "INT",
        AttributeType::Float => "FLOAT",
        AttributeType::Date => "DATE",
        AttributeType::DateTime => "DATETIME",
    }
}
