//! Error types for loading, building and reading the observation table.
//!
//! Load and build failures are terminal for a run. The variants are kept
//! distinct so the CLI can print a recovery hint per failure mode: a
//! missing file and a malformed file need different fixes.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the dataset pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file does not exist at the given path.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File extension is not one of the supported input formats.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// File exists but its content cannot be decoded into a labeled numeric table.
    #[error("Failed to parse {}: {reason}", path.display())]
    ParseFailure { path: PathBuf, reason: String },

    /// Loader outputs are not rectangular.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A row's category code has no entry in the category-name list.
    #[error("Row {row} has category code {code}, but only {available} categories are defined")]
    UnknownCategoryCode {
        row: usize,
        code: usize,
        available: usize,
    },

    /// Column was not found in the observation table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Column exists but is not a numeric measurement column.
    #[error("Column '{column}' is not numeric (found {dtype})")]
    NotNumeric { column: String, dtype: String },

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Short hint printed under the error by the CLI.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound(_) => Some("File not found. Please check the path."),
            Self::UnsupportedFormat { .. } => Some("Convert the file to CSV or Parquet."),
            Self::ParseFailure { .. } => Some("Error parsing the file. Check the header row, the label column and that measurement columns are numeric."),
            Self::ColumnNotFound(_) | Self::NotNumeric { .. } => {
                Some("Pick a numeric measurement column for this chart.")
            }
            _ => None,
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
