//! Structured error types for the chemlink workspace.

use thiserror::Error;

/// Unified error type for all chemlink operations.
#[derive(Debug, Error)]
pub enum ChemlinkError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// A structural notation supplied by the caller is not a valid molecule.
    #[error("unparsable structure '{notation}': {reason}")]
    StructureParse { notation: String, reason: String },

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A table is missing a column a stage was configured to read.
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Pipeline configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// CSV reading or writing failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the chemlink workspace.
pub type Result<T> = std::result::Result<T, ChemlinkError>;
