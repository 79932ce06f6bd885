//! Person model
//!
//! One row of a normalized ASEC extract: identifiers, household pointers,
//! the fields the relationship logic reads, and the income items that feed
//! tax-calculator inputs.

use arrow::array::{Array, Int64Array};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::algorithm::validation::IntegrityIssue;
use crate::error::{Result, TaxUnitError};
use crate::models::income::IncomeItems;
use crate::schema::asec;
use crate::utils::arrow::{column_as_i64, optional_column_as_i64};

/// Household-local person number (`pernum`)
pub type PersonNumber = u32;

/// A person record after missing-value normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Tax year the income refers to
    pub year: i32,
    /// Household identifier
    pub serial: i64,
    /// Person number within the household
    pub pernum: PersonNumber,
    pub age: i64,
    pub sex: i64,
    /// Relationship to the household reference person
    pub relate: i64,
    /// Person number this person is a dependent of, `0` for none
    pub depstat: i64,
    pub momloc: Option<PersonNumber>,
    pub poploc: Option<PersonNumber>,
    pub sploc: Option<PersonNumber>,
    /// School or college enrollment, positive when enrolled
    pub schlcoll: i64,
    pub income: IncomeItems,
}

impl PersonRecord {
    /// Whether the person is enrolled in school or college
    #[must_use]
    pub fn in_school(&self) -> bool {
        self.schlcoll > 0
    }

    /// Whether any parent pointer is present
    #[must_use]
    pub fn has_parent_in_household(&self) -> bool {
        self.momloc.is_some() || self.poploc.is_some()
    }

    /// Extract typed records from a normalized batch
    ///
    /// `tax_year` overrides the batch's `year` column; without either the
    /// batch is rejected. Rows whose identifiers cannot form a tax-unit key
    /// are collected and returned as a single integrity error.
    pub fn from_batch(batch: &RecordBatch, tax_year: Option<i32>) -> Result<Vec<Self>> {
        let columns = PersonColumns::read(batch, tax_year)?;
        let mut records = Vec::with_capacity(batch.num_rows());
        let mut issues = Vec::new();

        for row in 0..batch.num_rows() {
            match columns.record(row) {
                Ok(record) => records.push(record),
                Err(issue) => issues.push(issue),
            }
        }

        if issues.is_empty() {
            Ok(records)
        } else {
            Err(TaxUnitError::DataIntegrity(issues))
        }
    }
}

/// Columns of a normalized batch, cast to `Int64`
struct PersonColumns {
    year: Option<Int64Array>,
    tax_year: Option<i32>,
    serial: Int64Array,
    pernum: Int64Array,
    age: Int64Array,
    sex: Int64Array,
    relate: Int64Array,
    depstat: Int64Array,
    momloc: Int64Array,
    poploc: Int64Array,
    sploc: Int64Array,
    schlcoll: Int64Array,
    income: Vec<Option<Int64Array>>,
}

fn value(array: &Int64Array, row: usize) -> Option<i64> {
    (!array.is_null(row)).then(|| array.value(row))
}

impl PersonColumns {
    fn read(batch: &RecordBatch, tax_year: Option<i32>) -> Result<Self> {
        let year = optional_column_as_i64(batch, asec::YEAR)?;
        if year.is_none() && tax_year.is_none() {
            return Err(TaxUnitError::Schema(format!(
                "no '{}' column and no tax year configured",
                asec::YEAR
            )));
        }

        let income = IncomeItems::COLUMNS
            .iter()
            .map(|name| match asec::rule_for(name) {
                Some(rule) if !rule.required => optional_column_as_i64(batch, name),
                _ => column_as_i64(batch, name).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            year,
            tax_year,
            serial: column_as_i64(batch, asec::SERIAL)?,
            pernum: column_as_i64(batch, asec::PERNUM)?,
            age: column_as_i64(batch, asec::AGE)?,
            sex: column_as_i64(batch, asec::SEX)?,
            relate: column_as_i64(batch, asec::RELATE)?,
            depstat: column_as_i64(batch, asec::DEPSTAT)?,
            momloc: column_as_i64(batch, asec::MOMLOC)?,
            poploc: column_as_i64(batch, asec::POPLOC)?,
            sploc: column_as_i64(batch, asec::SPLOC)?,
            schlcoll: column_as_i64(batch, asec::SCHLCOLL)?,
            income,
        })
    }

    fn record(&self, row: usize) -> std::result::Result<PersonRecord, IntegrityIssue> {
        let invalid = |column: &'static str, value: Option<i64>| IntegrityIssue::InvalidIdentifier {
            row,
            column,
            value,
        };

        let serial = value(&self.serial, row)
            .filter(|s| *s >= 0)
            .ok_or_else(|| invalid(asec::SERIAL, value(&self.serial, row)))?;
        let pernum = value(&self.pernum, row)
            .and_then(|p| PersonNumber::try_from(p).ok())
            .filter(|p| *p > 0)
            .ok_or_else(|| invalid(asec::PERNUM, value(&self.pernum, row)))?;

        let year = match self.tax_year {
            Some(year) => year,
            None => self
                .year
                .as_ref()
                .and_then(|y| value(y, row))
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| {
                    invalid(asec::YEAR, self.year.as_ref().and_then(|y| value(y, row)))
                })?,
        };

        let age = value(&self.age, row).ok_or(IntegrityIssue::MissingAge { serial, pernum })?;

        let pointer = |array: &Int64Array, column: &'static str| match value(array, row) {
            None => Ok(None),
            Some(v) => PersonNumber::try_from(v)
                .ok()
                .filter(|p| *p > 0)
                .map(Some)
                .ok_or(IntegrityIssue::InvalidPointer {
                    serial,
                    pernum,
                    column,
                    value: v,
                }),
        };

        let mut income = [0_i64; 10];
        for (slot, array) in income.iter_mut().zip(&self.income) {
            *slot = array.as_ref().and_then(|a| value(a, row)).unwrap_or(0);
        }

        Ok(PersonRecord {
            year,
            serial,
            pernum,
            age,
            // "Not in universe" is coded 0 by IPUMS for these items.
            sex: value(&self.sex, row).unwrap_or(0),
            relate: value(&self.relate, row).unwrap_or(0),
            depstat: value(&self.depstat, row).unwrap_or(0),
            momloc: pointer(&self.momloc, asec::MOMLOC)?,
            poploc: pointer(&self.poploc, asec::POPLOC)?,
            sploc: pointer(&self.sploc, asec::SPLOC)?,
            schlcoll: value(&self.schlcoll, row).unwrap_or(0),
            income: IncomeItems::from_values(income),
        })
    }
}
