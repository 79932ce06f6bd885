//! Utilities for working with Arrow arrays.
//!
//! Safe extraction of columns from record batches, casting to the integer
//! representation every ASEC variable uses, and rebuilding batches with
//! some columns swapped out.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Result, TaxUnitError};

/// Get a column from a record batch by name
///
/// # Errors
/// Returns a schema error if the column does not exist
pub fn get_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(column_name)
        .ok_or_else(|| TaxUnitError::missing_column(column_name))
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| TaxUnitError::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Cast an array to `Int64`, leaving it untouched when it already is
fn cast_to_i64(array: &ArrayRef, column_name: &str) -> Result<ArrayRef> {
    if array.data_type() == &DataType::Int64 {
        return Ok(Arc::clone(array));
    }

    debug!(
        "Casting column '{column_name}' from {:?} to Int64",
        array.data_type()
    );
    cast(array, &DataType::Int64).map_err(|_| TaxUnitError::InvalidDataType {
        column: column_name.to_string(),
        expected: "Int64".to_string(),
    })
}

/// Read a required column as `Int64`
///
/// Integer, float and numeric-string columns are cast; values that do not
/// fit become null.
pub fn column_as_i64(batch: &RecordBatch, column_name: &str) -> Result<Int64Array> {
    let column = get_column(batch, column_name)?;
    let casted = cast_to_i64(column, column_name)?;
    let array = downcast_array::<Int64Array>(&casted, column_name, "Int64")?;
    Ok(array.clone())
}

/// Read an optional column as `Int64`, `None` when the batch lacks it
pub fn optional_column_as_i64(batch: &RecordBatch, column_name: &str) -> Result<Option<Int64Array>> {
    if batch.column_by_name(column_name).is_none() {
        return Ok(None);
    }
    column_as_i64(batch, column_name).map(Some)
}

/// Rebuild a batch with some columns replaced by new `Int64` arrays
///
/// Columns keep their position; every other column is shared, not copied.
pub fn replace_columns(
    batch: &RecordBatch,
    replacements: Vec<(usize, Int64Array)>,
) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    for (idx, array) in replacements {
        let nullable = array.null_count() > 0;
        fields[idx] = Field::new(fields[idx].name(), DataType::Int64, nullable);
        columns[idx] = Arc::new(array);
    }

    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Add the columns of `extra` whose names `base` does not already have
///
/// Both batches must have the same number of rows.
pub fn append_new_columns(base: &RecordBatch, extra: &RecordBatch) -> Result<RecordBatch> {
    let base_schema = base.schema();
    let mut fields: Vec<Field> = base_schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = base.columns().to_vec();

    let extra_schema = extra.schema();
    for (field, column) in extra_schema.fields().iter().zip(extra.columns()) {
        if base_schema.index_of(field.name()).is_ok() {
            continue;
        }
        fields.push(field.as_ref().clone());
        columns.push(Arc::clone(column));
    }

    let schema = Arc::new(Schema::new_with_metadata(fields, base_schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Concatenate batches whose schemas differ only in nullability
///
/// Every field of the result is nullable. `None` when there are no batches.
pub fn concat_nullable(batches: &[RecordBatch]) -> Result<Option<RecordBatch>> {
    let Some(first) = batches.first() else {
        return Ok(None);
    };

    let schema = Arc::new(Schema::new_with_metadata(
        first
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone().with_nullable(true))
            .collect::<Vec<_>>(),
        first.schema().metadata().clone(),
    ));
    let relaxed = batches
        .iter()
        .map(|batch| RecordBatch::try_new(Arc::clone(&schema), batch.columns().to_vec()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Some(concat_batches(&schema, &relaxed)?))
}
