//! Data-integrity checks for households and tax units
//!
//! Each stage reports what it found as [`IntegrityIssue`]s. Whether an
//! issue stops the run depends on its [`Severity`] and the configured
//! [`IntegrityMode`].

use itertools::Itertools;
use log::{error, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::algorithm::resolve::ResolvedPerson;
use crate::config::IntegrityMode;
use crate::error::{Result, TaxUnitError};
use crate::models::person::PersonNumber;
use crate::schema::asec::{RELATE_HEAD, RELATE_UNMARRIED_PARTNER};

/// How serious an integrity issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Suspicious but handled deterministically
    Warning,
    /// Violates a household or tax-unit invariant; fatal in strict mode
    Error,
    /// The tax-unit key itself cannot be formed; always fatal
    Fatal,
}

/// A violated household or tax-unit invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum IntegrityIssue {
    #[error("row {row}: invalid {column} {value:?}")]
    InvalidIdentifier {
        row: usize,
        column: &'static str,
        value: Option<i64>,
    },

    #[error("household {serial} person {pernum}: age is missing")]
    MissingAge { serial: i64, pernum: PersonNumber },

    #[error("household {serial} person {pernum}: {column} = {value} is not a person number")]
    InvalidPointer {
        serial: i64,
        pernum: PersonNumber,
        column: &'static str,
        value: i64,
    },

    #[error("household {serial} ({year}): person number {pernum} appears more than once")]
    DuplicatePernum {
        year: i32,
        serial: i64,
        pernum: PersonNumber,
    },

    #[error(
        "household {serial} person {pernum}: filer person number {filer_pernum} does not fit the tax-unit key"
    )]
    FilerPernumOverflow {
        serial: i64,
        pernum: PersonNumber,
        filer_pernum: PersonNumber,
    },

    #[error("tax unit {taxid} in {year}: record id would exceed the per-year key range")]
    RecordIdOverflow { year: i32, taxid: i64 },

    #[error(
        "household {serial} ({year}) person {pernum}: filer {filer_pernum} is not a member of the household"
    )]
    DanglingFiler {
        year: i32,
        serial: i64,
        pernum: PersonNumber,
        filer_pernum: PersonNumber,
    },

    #[error("household {serial} ({year}) person {pernum}: dependent resolves to itself as filer")]
    DependentOwnFiler {
        year: i32,
        serial: i64,
        pernum: PersonNumber,
    },

    #[error("tax unit {taxid}: no member is the filer head")]
    MissingHead { taxid: i64 },

    #[error("tax unit {taxid}: {count} members are marked as filer head")]
    MultipleHeads { taxid: i64, count: usize },

    #[error("tax unit {taxid}: {count} members are marked as filer spouse")]
    MultipleSpouses { taxid: i64, count: usize },

    #[error("household {serial} ({year}): reference person is person {pernum}, not person 1")]
    HeadNotFirstPerson {
        year: i32,
        serial: i64,
        pernum: PersonNumber,
    },

    #[error("household {serial} ({year}) person {pernum}: unmarried partner has a spouse pointer")]
    PartnerWithSpousePointer {
        year: i32,
        serial: i64,
        pernum: PersonNumber,
    },
}

impl IntegrityIssue {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidIdentifier { .. }
            | Self::MissingAge { .. }
            | Self::InvalidPointer { .. }
            | Self::DuplicatePernum { .. }
            | Self::FilerPernumOverflow { .. }
            | Self::RecordIdOverflow { .. } => Severity::Fatal,
            Self::DanglingFiler { .. }
            | Self::DependentOwnFiler { .. }
            | Self::MissingHead { .. }
            | Self::MultipleHeads { .. }
            | Self::MultipleSpouses { .. } => Severity::Error,
            Self::HeadNotFirstPerson { .. } | Self::PartnerWithSpousePointer { .. } => {
                Severity::Warning
            }
        }
    }
}

/// Issues gathered over a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep the issues a stage found, failing the run when required
    ///
    /// Fatal issues always fail; error-level issues fail in strict mode.
    /// The returned error carries every blocking issue of this stage.
    pub fn record(
        &mut self,
        stage: &str,
        issues: Vec<IntegrityIssue>,
        mode: IntegrityMode,
    ) -> Result<()> {
        let blocking: Vec<IntegrityIssue> = issues
            .iter()
            .filter(|issue| match issue.severity() {
                Severity::Fatal => true,
                Severity::Error => mode == IntegrityMode::Strict,
                Severity::Warning => false,
            })
            .cloned()
            .collect();

        for issue in &issues {
            match issue.severity() {
                Severity::Warning => warn!("{stage}: {issue}"),
                Severity::Error | Severity::Fatal => error!("{stage}: {issue}"),
            }
        }
        self.issues.extend(issues);

        if blocking.is_empty() {
            Ok(())
        } else {
            Err(TaxUnitError::DataIntegrity(blocking))
        }
    }

    /// Number of issues with the given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check household-level invariants of resolved persons
///
/// A household is a `(year, serial)` pair; serials are only unique within
/// one sample year.
///
/// - person numbers are unique within a household
/// - every filer person number names a member of the household
/// - no dependent is its own filer
/// - the reference person is person 1 (warning; dependent relatives are
///   assigned to person 1)
/// - unmarried partners carry no spouse pointer (warning)
#[must_use]
pub fn validate_households(persons: &[ResolvedPerson]) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let households = persons
        .iter()
        .into_group_map_by(|p| (p.person.year, p.person.serial))
        .into_iter()
        .sorted_by_key(|(key, _)| *key);

    for ((year, serial), members) in households {
        let mut pernums: FxHashSet<PersonNumber> = FxHashSet::default();
        for member in &members {
            if !pernums.insert(member.person.pernum) {
                issues.push(IntegrityIssue::DuplicatePernum {
                    year,
                    serial,
                    pernum: member.person.pernum,
                });
            }
        }

        for member in &members {
            let person = &member.person;

            if !pernums.contains(&member.filer_pernum) {
                issues.push(IntegrityIssue::DanglingFiler {
                    year,
                    serial,
                    pernum: person.pernum,
                    filer_pernum: member.filer_pernum,
                });
            }

            if member.is_dep() && member.filer_pernum == person.pernum {
                issues.push(IntegrityIssue::DependentOwnFiler {
                    year,
                    serial,
                    pernum: person.pernum,
                });
            }

            if person.relate == RELATE_HEAD && person.pernum != 1 {
                issues.push(IntegrityIssue::HeadNotFirstPerson {
                    year,
                    serial,
                    pernum: person.pernum,
                });
            }

            if person.relate == RELATE_UNMARRIED_PARTNER && person.sploc.is_some() {
                issues.push(IntegrityIssue::PartnerWithSpousePointer {
                    year,
                    serial,
                    pernum: person.pernum,
                });
            }
        }
    }

    issues
}

/// Count of filer heads and spouses per tax unit
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RoleCount {
    pub heads: usize,
    pub spouses: usize,
}

/// Check that each tax unit has exactly one head and at most one spouse
///
/// The head and spouse ages are recovered by summing over the unit, which
/// only works when these counts hold.
pub(crate) fn validate_roles(roles: &FxHashMap<(i32, i64), RoleCount>) -> Vec<IntegrityIssue> {
    roles
        .iter()
        .sorted_by_key(|(key, _)| **key)
        .flat_map(|(&(_, taxid), count)| {
            let mut issues = Vec::new();
            match count.heads {
                0 => issues.push(IntegrityIssue::MissingHead { taxid }),
                1 => {}
                n => issues.push(IntegrityIssue::MultipleHeads { taxid, count: n }),
            }
            if count.spouses > 1 {
                issues.push(IntegrityIssue::MultipleSpouses {
                    taxid,
                    count: count.spouses,
                });
            }
            issues
        })
        .collect()
}
