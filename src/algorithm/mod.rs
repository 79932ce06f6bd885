//! Household relationship resolution and tax-unit construction
//!
//! The stages in dependency order are [`normalize`], [`classify`],
//! [`resolve`] and [`aggregate`]; [`pipeline`] runs them end to end and
//! [`validation`] checks the invariants between them.

pub mod aggregate;
pub mod classify;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod validation;

pub use aggregate::aggregate_tax_units;
pub use classify::{DependencyStatus, classify};
pub use normalize::{normalize_batch, normalize_batches};
pub use pipeline::{PipelineOutput, TaxUnitPipeline};
pub use resolve::{ResolvedPerson, TaxUnitKey, resolve_persons};
pub use validation::{IntegrityIssue, IntegrityReport, Severity, validate_households};
