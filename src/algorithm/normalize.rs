//! Missing-value normalization of ASEC person batches
//!
//! Applies [`CLEANING_RULES`] column by column:
//!
//! * zero-means-absent pointers (`momloc`, `poploc`, `sploc`): `0` becomes null
//! * income and tax items: null or a missing code becomes `0`
//!
//! Every other column is passed through unchanged. Rows are independent, so
//! batches are normalized in parallel.

use std::time::Instant;

use arrow::array::Int64Array;
use arrow::record_batch::RecordBatch;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::Result;
use crate::schema::asec::{CLEANING_RULES, CleaningRule, is_missing_code};
use crate::schema::{lowercase_columns, validate_person_schema};
use crate::utils::arrow::{column_as_i64, replace_columns};
use crate::utils::logging::log_stage_complete;

/// Replace `0` with null
#[must_use]
pub fn zero_to_absent(array: &Int64Array) -> Int64Array {
    array.iter().map(|v| v.filter(|&x| x != 0)).collect()
}

/// Replace null and missing codes with `0`
#[must_use]
pub fn missing_to_zero(array: &Int64Array) -> Int64Array {
    array
        .iter()
        .map(|v| match v {
            Some(x) if !is_missing_code(x) => x,
            _ => 0,
        })
        .map(Some)
        .collect()
}

/// Normalize one batch
///
/// Column names are lower-cased and the required columns checked before
/// any value is touched.
pub fn normalize_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let batch = lowercase_columns(batch)?;
    validate_person_schema(&batch.schema())?;

    let schema = batch.schema();
    let mut replacements = Vec::with_capacity(CLEANING_RULES.len());

    for rule in CLEANING_RULES {
        let Ok(idx) = schema.index_of(rule.name) else {
            // Required columns were checked above; optional ones may be absent.
            continue;
        };
        let column = column_as_i64(&batch, rule.name)?;
        let cleaned = match rule.rule {
            CleaningRule::ZeroMeansAbsent => zero_to_absent(&column),
            CleaningRule::MissingCodesToZero => missing_to_zero(&column),
        };
        replacements.push((idx, cleaned));
    }

    replace_columns(&batch, replacements)
}

/// Normalize batches in parallel, preserving their order
pub fn normalize_batches(batches: &[RecordBatch], progress: &ProgressBar) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();

    let normalized = batches
        .par_iter()
        .map(|batch| {
            let result = normalize_batch(batch);
            progress.inc(1);
            result
        })
        .collect::<Result<Vec<_>>>()?;

    log_stage_complete("Normalize missing values", rows, rows, start.elapsed());
    Ok(normalized)
}
