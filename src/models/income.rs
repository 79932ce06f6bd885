//! Income items carried by a person record
//!
//! Only the items that feed tax-calculator inputs are kept on the typed
//! record; the remaining cleaned columns stay in the normalized batch.

use serde::{Deserialize, Serialize};

/// Annual income items of one person, in whole dollars
///
/// Values are read after normalization, so "not reported" is already `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeItems {
    /// Wage and salary income
    pub incwage: i64,
    /// Non-farm business income
    pub incbus: i64,
    /// Farm income
    pub incfarm: i64,
    /// Interest income
    pub incint: i64,
    /// Dividend income
    pub incdivid: i64,
    /// Retirement income
    pub incretir: i64,
    /// Social security income
    pub incss: i64,
    /// Unemployment compensation
    pub incunemp: i64,
    /// Capital gains
    pub inccapg: i64,
    /// Property taxes paid (absent from some extracts)
    pub proptax: i64,
}

impl IncomeItems {
    /// Column names read into this struct, in field order
    pub const COLUMNS: [&'static str; 10] = [
        "incwage", "incbus", "incfarm", "incint", "incdivid", "incretir", "incss", "incunemp",
        "inccapg", "proptax",
    ];

    /// Build from values listed in [`Self::COLUMNS`] order
    #[must_use]
    pub fn from_values(values: [i64; 10]) -> Self {
        let [
            incwage,
            incbus,
            incfarm,
            incint,
            incdivid,
            incretir,
            incss,
            incunemp,
            inccapg,
            proptax,
        ] = values;
        Self {
            incwage,
            incbus,
            incfarm,
            incint,
            incdivid,
            incretir,
            incss,
            incunemp,
            inccapg,
            proptax,
        }
    }

    /// Wages plus business and farm income
    #[must_use]
    pub fn earnings(&self) -> i64 {
        self.incwage + self.incbus + self.incfarm
    }
}
