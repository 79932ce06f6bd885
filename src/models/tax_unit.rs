//! Tax unit model
//!
//! One record per filing unit in the tax-calculator input layout. Built by
//! summing the [`TaxCalcPerson`] rows of the unit and then deriving the
//! filing status, credit counts and record id.

use serde::{Deserialize, Serialize};

use crate::models::person::PersonNumber;
use crate::models::taxcalc_person::TaxCalcPerson;
use crate::schema::taxcalc::FilingStatus;

/// Per-year spacing of record ids; `taxid` must stay below it
pub const RECID_YEAR_FACTOR: i64 = 1_000_000_000;

/// A tax unit ready for the tax calculator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxUnit {
    #[serde(rename = "RECID")]
    pub recid: i64,
    #[serde(rename = "FLPDYR")]
    pub year: i32,
    pub serial: i64,
    pub filer_pernum: PersonNumber,
    pub taxid: i64,
    #[serde(rename = "MARS")]
    pub mars: i32,
    #[serde(rename = "EIC")]
    pub eic: i64,

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

    pub e00200: i64,
    pub e00200p: i64,
    pub e00200s: i64,
    pub e00300: i64,
    pub e00600: i64,
    pub e00650: i64,
    pub e01500: i64,
    pub e01700: i64,
    pub e02300: i64,
    pub e02400: i64,
    pub p23250: i64,
    pub e18500: i64,

    pub age_head: i64,
    pub age_spouse: i64,

    /// Dependents in the unit
    #[serde(skip)]
    pub num_dependents: i64,
    /// Earned-income-credit qualifying children before the cap
    #[serde(skip)]
    pub num_eic_qualified: i64,
}

impl TaxUnit {
    /// Empty unit for the group a person belongs to
    #[must_use]
    pub fn for_member(member: &TaxCalcPerson) -> Self {
        Self {
            year: member.year,
            serial: member.serial,
            filer_pernum: member.filer_pernum,
            taxid: member.taxid,
            ..Default::default()
        }
    }

    /// Add one member's contribution to the sums
    pub fn absorb(&mut self, member: &TaxCalcPerson) {
        self.xtot += member.xtot;
        self.nu06 += member.nu06;
        self.nu13 += member.nu13;
        self.f2441 += member.f2441;
        self.n24 += member.n24;
        self.elderly_dependents += member.elderly_dependents;
        self.nu18 += member.nu18;
        self.n1820 += member.n1820;
        self.n21 += member.n21;

        self.e00200 += member.e00200;
        self.e00200p += member.e00200p;
        self.e00200s += member.e00200s;
        self.e00300 += member.e00300;
        self.e00600 += member.e00600;
        self.e00650 += member.e00650;
        self.e01500 += member.e01500;
        self.e01700 += member.e01700;
        self.e02300 += member.e02300;
        self.e02400 += member.e02400;
        self.p23250 += member.p23250;
        self.e18500 += member.e18500;

        self.age_head += member.age_head;
        self.age_spouse += member.age_spouse;

        self.num_dependents += i64::from(member.is_dep);
        self.num_eic_qualified += member.eic_qualified;
    }

    /// Filing status from the summed members
    ///
    /// Joint when a spouse is present, head of household when there are
    /// dependents, single otherwise.
    #[must_use]
    pub fn filing_status(&self) -> FilingStatus {
        if self.age_spouse > 0 {
            FilingStatus::Joint
        } else if self.num_dependents > 0 {
            FilingStatus::HeadOfHousehold
        } else {
            FilingStatus::Single
        }
    }

    /// Derive `MARS`, `EIC` and `RECID` once every member is absorbed
    pub fn finalize(&mut self, max_eic_children: i64) {
        self.mars = self.filing_status().code();
        self.eic = self.num_eic_qualified.min(max_eic_children);
        self.recid = i64::from(self.year) * RECID_YEAR_FACTOR + self.taxid;
    }
}
