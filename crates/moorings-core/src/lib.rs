//! Core record and criteria model for Moorings
//!
//! This crate defines the storage-agnostic half of the translation layer:
//! typed values, attribute schemas, declarative criteria trees, the
//! collection registry, and the row shapes a driver hands back. Dialect
//! crates (e.g. `moorings-mssql`) consume these types read-only and turn
//! them into statement text.

pub mod criteria;
pub mod registry;
pub mod row;
pub mod schema;
pub mod value;

pub use criteria::{
    CompareOp, Criteria, CriteriaError, Criterion, Sort, SortOrder, WhereNode,
};
pub use registry::{Collection, CollectionRegistry};
pub use row::{Column, ResultSet};
pub use schema::{Attribute, AttributeSchema, AttributeType};
pub use value::{record_values, SqlValue};
