//! Error types for the tabula engine.

use crate::ColumnName;
use thiserror::Error;

/// All possible errors from the tabula engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Positioning errors
    #[error("no current row")]
    NoCurrentRow,

    // Column resolution errors
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    #[error("no such column: {0}")]
    NoSuchColumn(ColumnName),

    #[error("type mismatch for column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: ColumnName,
        expected: String,
        got: String,
    },

    // Lifecycle errors
    #[error("result set closed")]
    ResourceClosed,

    #[error("not supported: {0}")]
    Unsupported(&'static str),

    // Ingestion errors
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
