// In: src/error.rs

//! This module defines the single, unified error type for the entire analysis toolkit.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    // =========================================================================
    // === Input Errors (fatal to the report they occur in)
    // =========================================================================
    /// A malformed encoded field, chain text, or scalar cell.
    #[error("Malformed value '{value}': {reason}")]
    Format { value: String, reason: String },

    /// A row whose column count does not match the selected input layout.
    #[error("Schema mismatch on line {line}: expected {expected} columns, found {found} in '{row}'")]
    Schema {
        expected: usize,
        found: usize,
        line: u64,
        /// The offending row, tab-joined as read.
        row: String,
    },

    /// A restriction filter left nothing to aggregate. Reporters recover from this
    /// by emitting an empty table.
    #[error("No rows left after restriction: {0}")]
    EmptyResult(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the CSV reader/writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error from the Serde JSON library, typically while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub(crate) fn format(value: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyzeError::Format {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors a reporter may absorb without failing the run.
    pub fn is_soft(&self) -> bool {
        matches!(self, AnalyzeError::EmptyResult(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
