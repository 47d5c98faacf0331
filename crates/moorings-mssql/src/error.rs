//! Error types for the dialect crate.

use moorings_core::CriteriaError;
use thiserror::Error;

/// Statement compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The criteria tree failed to parse.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// INSERT or UPDATE with nothing to write.
    #[error("no values to write for table {table}")]
    EmptyValues { table: String },
}

/// Result type for statement compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a connection string nor connection settings were given.
    #[error("no connection configuration provided")]
    MissingConnection,
}
