//! SQL Server-style statement dialect for Moorings
//!
//! This crate turns the storage-agnostic model of `moorings-core` into
//! T-SQL text: bracketed identifiers, quoted literals, `OUTPUT
//! INSERTED.*`, `TOP n`, and `INFORMATION_SCHEMA` introspection. It
//! compiles statements and decodes result rows but never opens a
//! connection — execution belongs to the caller's driver.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moorings_core::{Collection, CollectionRegistry, Criteria};
//! use moorings_mssql::Statements;
//!
//! let collection = registry.get("person").unwrap();
//! let statements = Statements::new(&collection.table, &collection.schema);
//!
//! let criteria: Criteria = serde_json::from_value(query_json)?;
//! let sql = statements.select(&criteria)?;
//! // hand `sql` to the driver, feed its rows through `codec::decode_row`
//! ```

pub mod codec;
pub mod compile;
pub mod config;
pub mod error;
pub mod escape;
pub mod normalize;
pub mod statement;

// Re-exports
pub use codec::{decode, decode_record, decode_row, encode};
pub use config::MssqlConfig;
pub use error::{CompileError, CompileResult, ConfigError};
pub use escape::{quote_ident, SqlLiteral};
pub use normalize::{normalize_schema, ColumnRow, ConstraintRow};
pub use statement::Statements;
