//! Input column definitions for IPUMS ASEC person extracts
//!
//! Column names are the lower-cased IPUMS variable names. The cleaning
//! applied to each column lives in a single table, [`CLEANING_RULES`].

use arrow::datatypes::Schema;

use crate::error::{Result, TaxUnitError};

pub const SERIAL: &str = "serial";
pub const PERNUM: &str = "pernum";
pub const YEAR: &str = "year";
pub const AGE: &str = "age";
pub const SEX: &str = "sex";
pub const RELATE: &str = "relate";
pub const DEPSTAT: &str = "depstat";
pub const MOMLOC: &str = "momloc";
pub const POPLOC: &str = "poploc";
pub const SPLOC: &str = "sploc";
pub const SCHLCOLL: &str = "schlcoll";

/// `relate` code of the household reference person
pub const RELATE_HEAD: i64 = 101;

/// `relate` code of an unmarried partner of the reference person
pub const RELATE_UNMARRIED_PARTNER: i64 = 1114;

/// Structural columns every extract must carry
pub const REQUIRED_PERSON_COLUMNS: [&str; 10] = [
    SERIAL, PERNUM, AGE, SEX, RELATE, DEPSTAT, MOMLOC, POPLOC, SPLOC, SCHLCOLL,
];

/// Reserved codes meaning "not reported" in ASEC income and tax items
pub const MISSING_CODES: [i64; 12] = [
    9999, 99999, 999_999, 9_999_999, -9999, -99999, -999_999, -9_999_999, 9997, 99997, 999_997,
    9_999_997,
];

/// How a column is cleaned before any relationship logic runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningRule {
    /// `0` means "no such person": replaced with null
    ZeroMeansAbsent,
    /// Null or a missing code means "not reported": replaced with `0`
    MissingCodesToZero,
}

/// A column and the cleaning applied to it
#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub name: &'static str,
    pub rule: CleaningRule,
    pub required: bool,
}

const fn pointer(name: &'static str) -> ColumnRule {
    ColumnRule {
        name,
        rule: CleaningRule::ZeroMeansAbsent,
        required: true,
    }
}

const fn income(name: &'static str) -> ColumnRule {
    ColumnRule {
        name,
        rule: CleaningRule::MissingCodesToZero,
        required: true,
    }
}

/// Every cleaned column. Columns not listed here pass through untouched.
pub const CLEANING_RULES: &[ColumnRule] = &[
    pointer(MOMLOC),
    pointer(POPLOC),
    pointer(SPLOC),
    income("eitcred"),
    income("fedretir"),
    income("fedtax"),
    income("statetax"),
    income("adjginc"),
    income("taxinc"),
    income("fedtaxac"),
    income("fica"),
    income("stataxac"),
    income("incdivid"),
    income("incint"),
    income("incrent"),
    income("incother"),
    income("incasist"),
    income("incss"),
    income("incwelfr"),
    income("incwkcom"),
    income("incvet"),
    income("incchild"),
    income("incunemp"),
    income("inceduc"),
    income("gotveduc"),
    income("gotvothe"),
    income("gotvpens"),
    income("gotvsurv"),
    income("incssi"),
    income("incwage"),
    income("incbus"),
    income("incfarm"),
    income("incsurv"),
    income("incdisab"),
    income("incretir"),
    income("inccapg"),
    ColumnRule {
        name: "proptax",
        rule: CleaningRule::MissingCodesToZero,
        required: false,
    },
];

/// Whether `value` is one of the "not reported" codes
#[must_use]
pub fn is_missing_code(value: i64) -> bool {
    MISSING_CODES.contains(&value)
}

/// Look up the cleaning rule for a column, if it has one
#[must_use]
pub fn rule_for(column: &str) -> Option<&'static ColumnRule> {
    CLEANING_RULES.iter().find(|r| r.name == column)
}

/// Names of all columns an extract must contain
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    REQUIRED_PERSON_COLUMNS.iter().copied().chain(
        CLEANING_RULES
            .iter()
            .filter(|r| r.required && r.rule == CleaningRule::MissingCodesToZero)
            .map(|r| r.name),
    )
}

/// Check that a (lower-cased) schema carries every required column
///
/// Reports all missing columns at once rather than the first one found.
pub fn validate_person_schema(schema: &Schema) -> Result<()> {
    let missing: Vec<&str> = required_columns()
        .filter(|name| schema.index_of(name).is_err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TaxUnitError::Schema(format!(
            "required column(s) not found: {}",
            missing.join(", ")
        )))
    }
}
