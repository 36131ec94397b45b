use crate::schema::StatementLine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Required total-assets line item not found")]
    TotalAssetsNotFound,

    #[error("Line item '{line}' is ambiguous: {matches} rows match")]
    AmbiguousLineItem { line: StatementLine, matches: usize },

    #[error("Statement contains no line items")]
    EmptyStatement,

    #[error("Row {row} has {found} fields, expected {expected} (label, prior, current)")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[cfg(feature = "gemini")]
    #[error("Narrative generation failed: {0}")]
    NarrativeFailed(String),
}

impl AnalysisError {
    /// Structural errors mean the input statement itself must be corrected.
    /// Callers should discard any summary or chat state built from a previous table.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AnalysisError::TotalAssetsNotFound
                | AnalysisError::AmbiguousLineItem { .. }
                | AnalysisError::EmptyStatement
                | AnalysisError::ColumnCountMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
