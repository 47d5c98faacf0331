//! Raw result shapes handed back by a driver executor.
//!
//! The executor itself lives outside this workspace: callers pass
//! compiled statement text to it and feed the rows it returns through a
//! dialect codec. These types only fix the interchange shape.

use serde::Deserialize;
use serde_json::Value;

/// Column metadata for one result set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    pub name: String,
    /// Driver-reported type name, when the driver supplies one.
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
}

/// One positional result set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}
