//! Output column names of the tax-calculator records format
//!
//! The typed rows in [`crate::models`] carry these names through serde
//! renames; the constants here are for code that addresses the produced
//! record batches by column.

use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;

/// One-to-one renames from ASEC income items to tax-calculator inputs
pub const ASEC_TAXCALC_RENAMES: [(&str, &str); 7] = [
    ("incunemp", "e02300"),
    ("inccapg", "p23250"),
    ("proptax", "e18500"),
    ("incdivid", "e00650"),
    ("incretir", "e01700"),
    ("incss", "e02400"),
    ("incint", "e00300"),
];

pub const RECID: &str = "RECID";
pub const FLPDYR: &str = "FLPDYR";
pub const MARS: &str = "MARS";
pub const EIC: &str = "EIC";
pub const XTOT: &str = "XTOT";
pub const AGE_HEAD: &str = "age_head";
pub const AGE_SPOUSE: &str = "age_spouse";
pub const E00200: &str = "e00200";
pub const E00200P: &str = "e00200p";
pub const E00200S: &str = "e00200s";
pub const TAXID: &str = "taxid";
pub const FILER_PERNUM: &str = "filer_pernum";

/// Target name of an ASEC income column, if it is renamed one-to-one
#[must_use]
pub fn taxcalc_name(asec_column: &str) -> Option<&'static str> {
    ASEC_TAXCALC_RENAMES
        .iter()
        .find(|(from, _)| *from == asec_column)
        .map(|(_, to)| *to)
}

/// Rename the one-to-one income columns of a normalized batch
///
/// Data is not copied; columns without a tax-calculator name keep theirs.
pub fn rename_to_taxcalc(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| match taxcalc_name(field.name()) {
            Some(name) => field.as_ref().clone().with_name(name),
            None => field.as_ref().clone(),
        })
        .collect();
    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, batch.columns().to_vec())?)
}

/// Filing status codes of the tax-calculator `MARS` variable
///
/// Widowed and separated statuses cannot be told apart in the survey and
/// are never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FilingStatus {
    Single = 1,
    Joint = 2,
    HeadOfHousehold = 4,
}

impl FilingStatus {
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}
