//! Person-level tax-calculator columns
//!
//! Each resolved person is given the tax-calculator inputs they contribute
//! to their unit. Summing these rows by unit yields the unit record:
//! flags are stored as `0`/`1` counts and head/spouse values are zero on
//! every row except the one person holding that role.

use serde::{Deserialize, Serialize};

use crate::algorithm::classify::is_eic_qualifying;
use crate::algorithm::resolve::ResolvedPerson;
use crate::models::person::PersonNumber;

/// Tax-calculator inputs contributed by one person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalcPerson {
    pub serial: i64,
    pub pernum: PersonNumber,
    pub filer_pernum: PersonNumber,
    pub taxid: i64,
    #[serde(rename = "FLPDYR")]
    pub year: i32,
    pub age: i64,

    pub is_dep: bool,
    pub depchild: bool,
    pub deprel: bool,
    pub is_filer_head: bool,
    pub is_filer_spouse: bool,
    pub eic_qualified: i64,

    #[serde(rename = "XTOT")]
    pub xtot: i64,
    pub nu06: i64,
    pub nu13: i64,
    pub f2441: i64,
    pub n24: i64,
    pub elderly_dependents: i64,
    pub nu18: i64,
    pub n1820: i64,
    pub n21: i64,

    /// Wages plus business and farm income
    pub e00200: i64,
    pub e00200p: i64,
    pub e00200s: i64,
    /// Interest
    pub e00300: i64,
    /// Ordinary dividends (all dividends)
    pub e00600: i64,
    /// Qualified dividends
    pub e00650: i64,
    /// Taxable pensions (all pensions)
    pub e01500: i64,
    /// Total pensions
    pub e01700: i64,
    /// Unemployment compensation
    pub e02300: i64,
    /// Social security benefits
    pub e02400: i64,
    /// Long-term capital gains
    pub p23250: i64,
    /// Real-estate taxes
    pub e18500: i64,

    pub age_head: i64,
    pub age_spouse: i64,
}

fn flag(condition: bool) -> i64 {
    i64::from(condition)
}

impl From<&ResolvedPerson> for TaxCalcPerson {
    fn from(resolved: &ResolvedPerson) -> Self {
        let person = &resolved.person;
        let income = &person.income;
        let age = person.age;
        let is_dep = resolved.is_dep();
        let is_filer_head = resolved.is_filer_head();
        let is_filer_spouse = resolved.is_filer_spouse();
        let earnings = income.earnings();

        Self {
            serial: person.serial,
            pernum: person.pernum,
            filer_pernum: resolved.filer_pernum,
            taxid: resolved.taxid,
            year: person.year,
            age,

            is_dep,
            depchild: resolved.depchild(),
            deprel: resolved.deprel(),
            is_filer_head,
            is_filer_spouse,
            eic_qualified: flag(is_eic_qualifying(resolved.status)),

            xtot: 1,
            nu06: flag(age < 6 && is_dep),
            nu13: flag(age < 13 && is_dep),
            f2441: flag(age < 13 && is_dep),
            n24: flag(age < 17 && is_dep),
            elderly_dependents: flag(age > 65 && is_dep),
            nu18: flag(age < 18),
            n1820: flag((18..=20).contains(&age)),
            n21: flag(age > 20),

            e00200: earnings,
            e00200p: if is_filer_head { earnings } else { 0 },
            e00200s: if is_filer_spouse { earnings } else { 0 },
            e00300: income.incint,
            e00600: income.incdivid,
            e00650: income.incdivid,
            e01500: income.incretir,
            e01700: income.incretir,
            e02300: income.incunemp,
            e02400: income.incss,
            p23250: income.inccapg,
            e18500: income.proptax,

            age_head: if is_filer_head { age } else { 0 },
            age_spouse: if is_filer_spouse { age } else { 0 },
        }
    }
}
