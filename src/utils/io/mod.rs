//! IO utilities for file operations
//!
//! Dispatches table reads and writes on the file extension: Parquet files
//! or directories of them, and CSV.

pub mod csv;
pub mod parquet;

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::error::{Result, TaxUnitError};

pub use self::csv::{read_csv, write_csv};
pub use self::parquet::{find_parquet_files, load_parquet_files_parallel, read_parquet, write_parquet};

/// Default batch size for reading extracts
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// On-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
    /// A directory holding Parquet files
    ParquetDirectory,
}

impl TableFormat {
    /// Detect the format of a path from its extension, or directory-ness
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::ParquetDirectory);
        }

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("parquet") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(TaxUnitError::io_with_path(
                path,
                "unsupported table format, expected .parquet, .csv or a directory",
            )),
        }
    }
}

/// Read a table from a file or directory
pub fn read_table(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    match TableFormat::detect(path)? {
        TableFormat::Parquet => read_parquet(path, batch_size),
        TableFormat::Csv => read_csv(path, batch_size),
        TableFormat::ParquetDirectory => load_parquet_files_parallel(path, batch_size),
    }
}

/// Write a table to a file, choosing the format from the extension
pub fn write_table(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    match TableFormat::detect(path)? {
        TableFormat::Parquet => write_parquet(path, batches),
        TableFormat::Csv => write_csv(path, batches),
        TableFormat::ParquetDirectory => Err(TaxUnitError::io_with_path(
            path,
            "output must be a file, not a directory",
        )),
    }
}
