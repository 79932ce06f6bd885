//! Tax-unit aggregation
//!
//! Groups person-level tax-calculator rows by `(year, taxid)`, sums them
//! and derives the unit-level fields. This is the one step that needs all
//! rows of a unit together.

use std::collections::BTreeMap;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::algorithm::validation::{IntegrityIssue, RoleCount, validate_roles};
use crate::models::tax_unit::{RECID_YEAR_FACTOR, TaxUnit};
use crate::models::taxcalc_person::TaxCalcPerson;
use crate::utils::logging::log_stage_complete;

/// Sum person rows into tax units
///
/// Units come back ordered by `(year, taxid)`, i.e. by record id, so the
/// result does not depend on the order of `members`. Along with the units
/// the function returns the role and key issues it found: units without
/// exactly one head, with more than one spouse, or whose record id would
/// leave the per-year range.
#[must_use]
pub fn aggregate_tax_units(
    members: &[TaxCalcPerson],
    max_eic_children: i64,
) -> (Vec<TaxUnit>, Vec<IntegrityIssue>) {
    let start = Instant::now();

    let mut units: BTreeMap<(i32, i64), TaxUnit> = BTreeMap::new();
    let mut roles: FxHashMap<(i32, i64), RoleCount> = FxHashMap::default();

    for member in members {
        units
            .entry((member.year, member.taxid))
            .or_insert_with(|| TaxUnit::for_member(member))
            .absorb(member);

        let count = roles.entry((member.year, member.taxid)).or_default();
        count.heads += usize::from(member.is_filer_head);
        count.spouses += usize::from(member.is_filer_spouse);
    }

    let mut issues = validate_roles(&roles);
    let units: Vec<TaxUnit> = units
        .into_values()
        .map(|mut unit| {
            if !(0..RECID_YEAR_FACTOR).contains(&unit.taxid) {
                issues.push(IntegrityIssue::RecordIdOverflow {
                    year: unit.year,
                    taxid: unit.taxid,
                });
            }
            unit.finalize(max_eic_children);
            unit
        })
        .collect();

    log_stage_complete("Aggregate tax units", members.len(), units.len(), start.elapsed());
    (units, issues)
}
