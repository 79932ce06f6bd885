//! CSV file operations
//!
//! IPUMS delivers extracts as CSV as often as Parquet. The schema is
//! inferred from the header and the leading rows.

use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::util::{safe_create_file, safe_open_file};
use crate::error::{Result, TaxUnitError};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Rows sampled for schema inference
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Read a CSV file with a header row into Arrow record batches
pub fn read_csv(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading csv file", path);

    let mut file = safe_open_file(path, "reading person records")?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(INFER_SCHEMA_ROWS))?;
    file.rewind()
        .map_err(|e| TaxUnitError::io_with_path(path, format!("failed to rewind: {e}")))?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_batch_size(batch_size)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete("Read", path, batches.len(), "batches", Some(start.elapsed()));
    Ok(batches)
}

/// Write record batches to a CSV file with a header row
pub fn write_csv(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    let start = std::time::Instant::now();
    log_operation_start("Writing csv file", path);

    let file = safe_create_file(path, "writing results")?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    for batch in batches {
        writer.write(batch)?;
    }
    writer
        .into_inner()
        .flush()
        .map_err(|e| TaxUnitError::io_with_path(path, format!("failed to flush: {e}")))?;

    log_operation_complete("Wrote", path, batches.len(), "batches", Some(start.elapsed()));
    Ok(())
}
