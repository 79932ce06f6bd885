//! Dependency classification of person records
//!
//! A person is a dependent when `depstat` names someone other than their
//! own spouse. Dependents with a parent in the household who are under 18,
//! or under 24 and enrolled, are dependent children; every other dependent
//! is a dependent relative. The split is structural: an age-qualifying
//! dependent without a parent pointer is a relative.

use serde::{Deserialize, Serialize};

use crate::models::person::PersonRecord;

/// Age below which a dependent with a parent present is a dependent child
pub const CHILD_AGE_LIMIT: i64 = 18;
/// Age below which an enrolled dependent with a parent present is a dependent child
pub const STUDENT_AGE_LIMIT: i64 = 24;

/// Dependency class of one person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyStatus {
    /// Not anyone's dependent: heads their own unit or is a spouse in one
    Filer,
    /// Dependent with a parent in the household meeting the age test
    DependentChild,
    /// Any other dependent
    DependentRelative,
}

impl DependencyStatus {
    #[must_use]
    pub fn is_dep(self) -> bool {
        !matches!(self, Self::Filer)
    }

    #[must_use]
    pub fn is_depchild(self) -> bool {
        matches!(self, Self::DependentChild)
    }

    #[must_use]
    pub fn is_deprel(self) -> bool {
        matches!(self, Self::DependentRelative)
    }
}

/// Whether the person is a dependent of someone other than their spouse
#[must_use]
pub fn is_dependent(person: &PersonRecord) -> bool {
    person.depstat > 0 && person.sploc.map(i64::from) != Some(person.depstat)
}

/// Whether the person meets the dependent-child age test
#[must_use]
pub fn meets_child_age_test(person: &PersonRecord) -> bool {
    person.age < CHILD_AGE_LIMIT || (person.age < STUDENT_AGE_LIMIT && person.in_school())
}

/// Classify a person
#[must_use]
pub fn classify(person: &PersonRecord) -> DependencyStatus {
    if !is_dependent(person) {
        DependencyStatus::Filer
    } else if person.has_parent_in_household() && meets_child_age_test(person) {
        DependencyStatus::DependentChild
    } else {
        DependencyStatus::DependentRelative
    }
}

/// Whether a classified person counts toward the earned income credit
///
/// Only dependent children sit in their parent's unit, so only they are
/// counted; older relatives would land in the household head's unit.
#[must_use]
pub fn is_eic_qualifying(status: DependencyStatus) -> bool {
    status.is_depchild()
}
