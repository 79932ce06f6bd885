//! Parquet file operations
//!
//! Reading ASEC extracts stored as Parquet (a single file or a directory
//! of files) and writing result tables back out.

use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rayon::prelude::*;

use crate::error::util::{safe_create_file, safe_open_file, validate_directory};
use crate::error::{Result, TaxUnitError};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `batch_size` - Maximum number of rows per returned batch
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = safe_open_file(path, "reading person records")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_size)
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete("Read", path, batches.len(), "batches", Some(start.elapsed()));
    Ok(batches)
}

/// Find all Parquet files in a directory, sorted by name
///
/// Sorting keeps the row order of a multi-file extract stable between runs.
pub fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for parquet files in", dir);
    validate_directory(dir, "reading person records")?;

    let entries = std::fs::read_dir(dir).map_err(|e| {
        TaxUnitError::io_with_path(dir, format!("failed to read directory: {e}"))
    })?;

    let parquet_files = entries
        .map(|entry| entry.map(|e| e.path()))
        .filter_ok(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "parquet"))
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .sorted()
        .collect_vec();

    if parquet_files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    } else {
        log_operation_complete("Found", dir, parquet_files.len(), "parquet files", None);
    }

    Ok(parquet_files)
}

/// Load all parquet files from a directory in parallel
///
/// Batches are returned in file-name order regardless of which file
/// finished reading first.
pub fn load_parquet_files_parallel(dir: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let parquet_files = find_parquet_files(dir)?;

    if parquet_files.is_empty() {
        return Ok(Vec::new());
    }

    let per_file: Vec<Vec<RecordBatch>> = parquet_files
        .par_iter()
        .map(|path| read_parquet(path, batch_size))
        .collect::<Result<_>>()?;

    let combined = per_file.into_iter().flatten().collect_vec();

    log::info!(
        "Successfully loaded {} batches from {} Parquet files",
        combined.len(),
        parquet_files.len()
    );

    Ok(combined)
}

/// Write record batches to a single parquet file
///
/// All batches must share the schema of the first one.
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    let Some(first) = batches.first() else {
        return Err(TaxUnitError::io_with_path(path, "no record batches to write"));
    };

    let start = std::time::Instant::now();
    log_operation_start("Writing parquet file", path);

    let file = safe_create_file(path, "writing results")?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, first.schema(), Some(props))?;
    for batch in batches {
        writer.write(batch)?;
    }
    writer.close()?;

    log_operation_complete("Wrote", path, batches.len(), "batches", Some(start.elapsed()));
    Ok(())
}
