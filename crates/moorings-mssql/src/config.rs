//! Connection configuration marshaling.
//!
//! The dialect never opens a connection; it only builds the connection
//! string the caller's driver expects. Callers either pass the string
//! through verbatim or give keyed settings that are marshaled into
//! `Key=Value;` form.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Driver supplied when the connection settings name none.
pub const DEFAULT_DRIVER: &str = "SQL Server Native Client 11.0";

/// Connection settings for a SQL Server-style driver.
///
/// An explicit `connectionString` wins over keyed `connection` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MssqlConfig {
    #[serde(rename = "connectionString")]
    pub connection_string: Option<String>,
    /// Keyed settings, marshaled in deterministic key order.
    pub connection: BTreeMap<String, String>,
}

impl MssqlConfig {
    /// Resolve the connection string the driver should open.
    ///
    /// Keyed settings render as `Key=Value;` pairs with a trailing `;`
    /// stripped from each value first, so a caller-supplied terminator
    /// cannot smuggle an extra pair into the string.
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        if let Some(explicit) = &self.connection_string {
            return Ok(explicit.clone());
        }
        if self.connection.is_empty() {
            return Err(ConfigError::MissingConnection);
        }

        let mut settings = self.connection.clone();
        settings
            .entry("driver".to_string())
            .or_insert_with(|| DEFAULT_DRIVER.to_string());

        let mut rendered = String::new();
        for (key, value) in &settings {
            let value = value.strip_suffix(';').unwrap_or(value);
            rendered.push_str(key);
            rendered.push('=');
            rendered.push_str(value);
            rendered.push(';');
        }
        Ok(rendered)
    }
}
