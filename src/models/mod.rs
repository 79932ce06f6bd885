//! Domain models for the tax-unit pipeline
//!
//! Typed rows for each stage: normalized persons, their tax-calculator
//! contributions, and the aggregated tax units.

pub mod income;
pub mod person;
pub mod tax_unit;
pub mod taxcalc_person;

pub use income::IncomeItems;
pub use person::{PersonNumber, PersonRecord};
pub use tax_unit::TaxUnit;
pub use taxcalc_person::TaxCalcPerson;

use std::sync::Arc;

use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;

/// Conversion between typed rows and Arrow record batches
pub trait ArrowRows: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Arrow fields traced from the type
    fn fields() -> Result<Vec<FieldRef>> {
        Ok(Vec::<FieldRef>::from_type::<Self>(TracingOptions::default())?)
    }

    /// Arrow schema of the rows
    fn schema() -> Result<Schema> {
        Ok(Schema::new(Self::fields()?))
    }

    /// Convert rows to a record batch; an empty slice gives an empty batch
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let fields = Self::fields()?;
        if rows.is_empty() {
            return Ok(RecordBatch::new_empty(Arc::new(Schema::new(fields))));
        }
        Ok(serde_arrow::to_record_batch(&fields, &rows)?)
    }

    /// Convert a record batch back to rows
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }
}

impl ArrowRows for TaxUnit {}
impl ArrowRows for TaxCalcPerson {}
