//! Column schemas for the ASEC input and tax-calculator output tables.

pub mod asec;
pub mod taxcalc;

use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::{Result, TaxUnitError};

pub use asec::{CLEANING_RULES, CleaningRule, ColumnRule, MISSING_CODES, validate_person_schema};
pub use taxcalc::{ASEC_TAXCALC_RENAMES, FilingStatus, rename_to_taxcalc};

/// Lower-case every column name of a batch
///
/// Data is not copied. Two columns that collide after lower-casing make
/// the extract ambiguous and are rejected.
pub fn lowercase_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut seen = FxHashSet::default();
    let mut fields = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let name = field.name().to_lowercase();
        if !seen.insert(name.clone()) {
            return Err(TaxUnitError::Schema(format!(
                "column '{}' collides with another column after lower-casing",
                field.name()
            )));
        }
        fields.push(Field::new(name, field.data_type().clone(), field.is_nullable()));
    }

    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, batch.columns().to_vec())?)
}
