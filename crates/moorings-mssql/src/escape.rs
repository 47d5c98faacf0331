//! Identifier and literal quoting.
//!
//! [`SqlLiteral`] is the one trusted boundary between caller-supplied
//! values and statement text: everything spliced into a statement is
//! either a bracket-quoted identifier or a `SqlLiteral`. No other path
//! concatenates user input.

use std::fmt;

/// Bracket-quote an identifier: `name` → `[name]`.
///
/// The target dialect closes brackets without internal escaping; a `]`
/// inside an identifier is not representable and is left untouched.
pub fn quote_ident(name: &str) -> String {
    format!("[{name}]")
}

/// A literal already rendered safe for splicing into statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    /// Quote a text literal, doubling every single quote.
    pub fn quote(text: &str) -> Self {
        SqlLiteral(format!("'{}'", text.replace('\'', "''")))
    }

    /// The unquoted null marker.
    pub fn null() -> Self {
        SqlLiteral("NULL".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
