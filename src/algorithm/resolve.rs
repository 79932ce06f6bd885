//! Tax-unit key resolution
//!
//! Every person is assigned the person number of their unit's primary
//! filer:
//!
//! * dependent children go to the lower-numbered parent present
//! * dependent relatives go to person 1, the household head (a known
//!   simplification: the actual claimant is not identified)
//! * everyone else files for themselves, with married couples sharing the
//!   lower of the two person numbers
//!
//! The unit key is `taxid = 100 * serial + filer_pernum`.

use std::time::Instant;

use rayon::iter::Either;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::classify::{DependencyStatus, classify};
use crate::algorithm::validation::IntegrityIssue;
use crate::models::person::{PersonNumber, PersonRecord};
use crate::utils::logging::log_stage_complete;

/// Person number every dependent relative is assigned to
pub const HOUSEHOLD_HEAD_PERNUM: PersonNumber = 1;

/// Person numbers must stay below this to fit in the tax-unit key
pub const MAX_FILER_PERNUM: PersonNumber = 100;

/// Minimum over the pointers that are present
fn min_present(a: Option<PersonNumber>, b: Option<PersonNumber>) -> Option<PersonNumber> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Person number of the primary filer of a classified person's unit
#[must_use]
pub fn filer_pernum(person: &PersonRecord, status: DependencyStatus) -> PersonNumber {
    match status {
        DependencyStatus::DependentChild => min_present(person.momloc, person.poploc)
            // Dependent children always carry a parent pointer.
            .unwrap_or(HOUSEHOLD_HEAD_PERNUM),
        DependencyStatus::DependentRelative => HOUSEHOLD_HEAD_PERNUM,
        DependencyStatus::Filer => person
            .sploc
            .map_or(person.pernum, |spouse| person.pernum.min(spouse)),
    }
}

/// Household-plus-filer key of a tax unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxUnitKey {
    pub serial: i64,
    pub filer_pernum: PersonNumber,
}

impl TaxUnitKey {
    /// Build a key, rejecting filer numbers that would spill into the serial
    pub fn new(
        serial: i64,
        pernum: PersonNumber,
        filer_pernum: PersonNumber,
    ) -> Result<Self, IntegrityIssue> {
        if filer_pernum >= MAX_FILER_PERNUM {
            return Err(IntegrityIssue::FilerPernumOverflow {
                serial,
                pernum,
                filer_pernum,
            });
        }
        Ok(Self {
            serial,
            filer_pernum,
        })
    }

    /// `100 * serial + filer_pernum`
    #[must_use]
    pub fn taxid(&self) -> i64 {
        // Saturates so oversized serials surface as a record id overflow.
        i64::from(MAX_FILER_PERNUM)
            .saturating_mul(self.serial)
            .saturating_add(i64::from(self.filer_pernum))
    }
}

/// A person with their dependency class and tax-unit assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPerson {
    pub person: PersonRecord,
    pub status: DependencyStatus,
    pub filer_pernum: PersonNumber,
    pub taxid: i64,
}

impl ResolvedPerson {
    /// Classify and resolve one person
    pub fn resolve(person: PersonRecord) -> Result<Self, IntegrityIssue> {
        let status = classify(&person);
        let filer = filer_pernum(&person, status);
        let key = TaxUnitKey::new(person.serial, person.pernum, filer)?;
        Ok(Self {
            person,
            status,
            filer_pernum: key.filer_pernum,
            taxid: key.taxid(),
        })
    }

    #[must_use]
    pub fn key(&self) -> TaxUnitKey {
        TaxUnitKey {
            serial: self.person.serial,
            filer_pernum: self.filer_pernum,
        }
    }

    #[must_use]
    pub fn is_dep(&self) -> bool {
        self.status.is_dep()
    }

    #[must_use]
    pub fn depchild(&self) -> bool {
        self.status.is_depchild()
    }

    #[must_use]
    pub fn deprel(&self) -> bool {
        self.status.is_deprel()
    }

    /// Primary filer of their own unit
    #[must_use]
    pub fn is_filer_head(&self) -> bool {
        !self.is_dep() && self.person.pernum == self.filer_pernum
    }

    /// Secondary filer: the spouse of the unit's primary filer
    #[must_use]
    pub fn is_filer_spouse(&self) -> bool {
        !self.is_dep()
            && self.person.pernum != self.filer_pernum
            && self.person.sploc == Some(self.filer_pernum)
    }
}

/// Classify and resolve all persons in parallel
///
/// Input order is preserved. Persons whose key cannot be formed are
/// returned as issues instead of records.
#[must_use]
pub fn resolve_persons(persons: Vec<PersonRecord>) -> (Vec<ResolvedPerson>, Vec<IntegrityIssue>) {
    let start = Instant::now();
    let rows = persons.len();

    let (resolved, issues): (Vec<_>, Vec<_>) = persons
        .into_par_iter()
        .map(ResolvedPerson::resolve)
        .partition_map(|result| match result {
            Ok(person) => Either::Left(person),
            Err(issue) => Either::Right(issue),
        });

    log_stage_complete("Resolve tax units", rows, resolved.len(), start.elapsed());
    (resolved, issues)
}
