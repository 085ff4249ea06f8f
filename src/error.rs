//! Error types for the analysis pass.

use thiserror::Error;

/// Errors that can stop an analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The uploaded bytes could not be decoded as a table.
    #[error("Unreadable file: {0}")]
    UnreadableFile(String),

    /// No row survived timestamp parsing, so there is nothing to anchor a grid on.
    #[error("No valid timestamps found")]
    EmptyDataset,

    /// The requested column is not part of the table.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The interval string could not be parsed or is not positive.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// The duplicate policy string is not one of the known policies.
    #[error("Invalid duplicate policy: {0}")]
    InvalidPolicy(String),

    /// The value column for charting is missing or not numeric.
    #[error("Invalid value column: {0}")]
    InvalidValueColumn(String),
}

impl From<polars::error::PolarsError> for AnalysisError {
    fn from(err: polars::error::PolarsError) -> Self {
        AnalysisError::UnreadableFile(err.to_string())
    }
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
