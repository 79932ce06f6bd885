//! Build tax-calculator input records from IPUMS ASEC person microdata.
//!
//! Person rows are cleaned of missing-value codes, classified as filers,
//! dependent children or dependent relatives, assigned to a tax unit
//! within their household, and summed into one record per tax unit.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::{
    DependencyStatus, IntegrityIssue, IntegrityReport, PipelineOutput, ResolvedPerson, Severity,
    TaxUnitKey, TaxUnitPipeline,
};
pub use config::{IntegrityMode, PipelineConfig};
pub use error::{Result, TaxUnitError};
pub use models::{ArrowRows, IncomeItems, PersonRecord, TaxCalcPerson, TaxUnit};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;
