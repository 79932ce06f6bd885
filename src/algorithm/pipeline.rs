//! End-to-end tax-unit pipeline
//!
//! Runs the stages in dependency order, each taking the previous stage's
//! output and returning a new table:
//!
//! 1. normalize missing values (per batch, parallel)
//! 2. extract typed person records
//! 3. classify dependents and resolve tax-unit keys (per row, parallel)
//! 4. check household invariants
//! 5. derive person-level tax-calculator columns
//! 6. aggregate into tax units and check unit invariants
//!
//! Integrity issues are checked at every stage boundary.

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use log::info;
use rayon::prelude::*;

use crate::algorithm::aggregate::aggregate_tax_units;
use crate::algorithm::normalize::normalize_batches;
use crate::algorithm::resolve::{ResolvedPerson, resolve_persons};
use crate::algorithm::validation::{IntegrityReport, validate_households};
use crate::config::PipelineConfig;
use crate::error::{Result, TaxUnitError};
use crate::models::person::PersonRecord;
use crate::models::tax_unit::TaxUnit;
use crate::models::taxcalc_person::TaxCalcPerson;
use crate::models::ArrowRows;
use crate::schema::taxcalc::rename_to_taxcalc;
use crate::utils::arrow::{append_new_columns, concat_nullable};
use crate::utils::io::{read_table, write_table};
use crate::utils::logging::{create_batch_progress_bar, finish_progress_bar};

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Normalized batches, in input order
    pub normalized: Vec<RecordBatch>,
    /// Classified and resolved persons, in input order
    pub resolved: Vec<ResolvedPerson>,
    /// Person-level tax-calculator rows, in input order (row `i` belongs to
    /// row `i` of the concatenated normalized batches)
    pub persons: Vec<TaxCalcPerson>,
    /// Tax units ordered by record id
    pub tax_units: Vec<TaxUnit>,
    /// Integrity issues found along the way
    pub report: IntegrityReport,
}

impl PipelineOutput {
    /// Tax units as a record batch in the tax-calculator layout
    pub fn tax_units_batch(&self) -> Result<RecordBatch> {
        TaxUnit::to_record_batch(&self.tax_units)
    }

    /// Person-level table: the normalized extract, with the one-to-one
    /// income items renamed, plus classification, resolution and
    /// tax-calculator columns
    ///
    /// Source columns win over derived ones of the same name.
    pub fn persons_batch(&self) -> Result<RecordBatch> {
        let derived = TaxCalcPerson::to_record_batch(&self.persons)?;
        let Some(normalized) = concat_nullable(&self.normalized)? else {
            return Ok(derived);
        };

        if normalized.num_rows() != derived.num_rows() {
            return Err(TaxUnitError::Serialization(format!(
                "{} normalized rows but {} person rows",
                normalized.num_rows(),
                derived.num_rows()
            )));
        }
        append_new_columns(&rename_to_taxcalc(&normalized)?, &derived)
    }
}

/// Tax-unit pipeline over in-memory ASEC person batches
#[derive(Debug, Clone, Default)]
pub struct TaxUnitPipeline {
    config: PipelineConfig,
}

impl TaxUnitPipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over the given batches
    pub fn run(&self, batches: &[RecordBatch]) -> Result<PipelineOutput> {
        let start = Instant::now();
        let mode = self.config.integrity;
        let mut report = IntegrityReport::new();

        let progress = create_batch_progress_bar(
            batches.len() as u64,
            "normalizing",
            self.config.show_progress,
        );
        let normalized = normalize_batches(batches, &progress)?;
        finish_progress_bar(&progress, "normalized");

        let extracted: Vec<Result<Vec<PersonRecord>>> = normalized
            .par_iter()
            .map(|batch| PersonRecord::from_batch(batch, self.config.tax_year))
            .collect();
        let mut persons = Vec::new();
        let mut extraction_issues = Vec::new();
        for batch in extracted {
            match batch {
                Ok(records) => persons.extend(records),
                Err(TaxUnitError::DataIntegrity(issues)) => extraction_issues.extend(issues),
                Err(e) => return Err(e),
            }
        }
        report.record("extract persons", extraction_issues, mode)?;

        let (resolved, key_issues) = resolve_persons(persons);
        report.record("resolve tax units", key_issues, mode)?;
        report.record("validate households", validate_households(&resolved), mode)?;

        let taxcalc_persons: Vec<TaxCalcPerson> =
            resolved.par_iter().map(TaxCalcPerson::from).collect();

        let (tax_units, unit_issues) =
            aggregate_tax_units(&taxcalc_persons, self.config.max_eic_children);
        report.record("aggregate tax units", unit_issues, mode)?;

        info!(
            "Built {} tax units from {} persons in {:?} ({} integrity issue(s))",
            tax_units.len(),
            taxcalc_persons.len(),
            start.elapsed(),
            report.issues.len()
        );

        Ok(PipelineOutput {
            normalized,
            resolved,
            persons: taxcalc_persons,
            tax_units,
            report,
        })
    }

    /// Read an extract, run the pipeline and write the results
    ///
    /// Nothing is written unless every stage succeeds.
    pub fn run_files(
        &self,
        input: &Path,
        output: &Path,
        persons_output: Option<&Path>,
    ) -> Result<PipelineOutput> {
        let batches = read_table(input, self.config.batch_size)?;
        if batches.is_empty() {
            return Err(TaxUnitError::io_with_path(input, "extract contains no rows"));
        }

        let result = self.run(&batches)?;

        write_table(output, &[result.tax_units_batch()?])?;
        if let Some(path) = persons_output {
            write_table(path, &[result.persons_batch()?])?;
        }

        Ok(result)
    }
}
