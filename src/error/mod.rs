//! Error handling for the tax-unit pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::algorithm::validation::IntegrityIssue;

/// Specialized error type for the tax-unit pipeline
#[derive(Debug, thiserror::Error)]
pub enum TaxUnitError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// I/O failure with the path and purpose it happened for
    #[error("IO error on {}: {context}", .path.display())]
    IoWithPath { path: PathBuf, context: String },

    /// Error from an Arrow compute kernel or reader
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// A required input column is absent or ambiguous
    #[error("Schema error: {0}")]
    Schema(String),

    /// A column exists but cannot be read as the expected type
    #[error("Column '{column}' cannot be read as {expected}")]
    InvalidDataType { column: String, expected: String },

    /// One or more rows violate a household or tax-unit invariant
    #[error("Data integrity error: {} issue(s), first: {}", .0.len(), first_issue(.0))]
    DataIntegrity(Vec<IntegrityIssue>),

    /// Conversion between typed rows and record batches failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

fn first_issue(issues: &[IntegrityIssue]) -> String {
    issues
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

impl TaxUnitError {
    /// Schema error for a missing column
    pub fn missing_column(column: &str) -> Self {
        Self::Schema(format!("required column '{column}' not found"))
    }

    /// I/O error carrying the offending path
    pub fn io_with_path(path: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self::IoWithPath {
            path: path.into(),
            context: context.into(),
        }
    }
}

impl From<serde_arrow::Error> for TaxUnitError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for tax-unit pipeline operations
pub type Result<T> = std::result::Result<T, TaxUnitError>;
