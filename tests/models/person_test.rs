//! Tests for extracting typed person records from normalized batches

use asec_taxunits::algorithm::{IntegrityIssue, normalize_batch};
use asec_taxunits::{PersonRecord, TaxUnitError};

use crate::utils::{PersonRow, person_batch};

fn extract(rows: &[PersonRow], tax_year: Option<i32>) -> asec_taxunits::Result<Vec<PersonRecord>> {
    let batch = normalize_batch(&person_batch(rows))?;
    PersonRecord::from_batch(&batch, tax_year)
}

#[test]
fn test_extracts_fields_and_pointers() {
    let rows = vec![
        PersonRow::head(5, 40)
            .spouse_of(2)
            .income("incwage", Some(50_000))
            .income("incdivid", Some(1_200)),
        PersonRow::member(5, 2, 19, 301).child_of(0, 1).enrolled(),
    ];
    let persons = extract(&rows, None).unwrap();
    assert_eq!(persons.len(), 2);

    let head = &persons[0];
    assert_eq!(head.year, 2018);
    assert_eq!(head.serial, 5);
    assert_eq!(head.pernum, 1);
    assert_eq!(head.sploc, Some(2));
    assert_eq!(head.momloc, None);
    assert_eq!(head.income.incwage, 50_000);
    assert_eq!(head.income.incdivid, 1_200);
    // No property tax column in the extract.
    assert_eq!(head.income.proptax, 0);

    let child = &persons[1];
    assert_eq!(child.momloc, None);
    assert_eq!(child.poploc, Some(1));
    assert_eq!(child.depstat, 1);
    assert!(child.in_school());
    assert!(child.has_parent_in_household());
}

#[test]
fn test_configured_tax_year_wins() {
    let persons = extract(&[PersonRow::head(1, 30)], Some(2021)).unwrap();
    assert_eq!(persons[0].year, 2021);
}

#[test]
fn test_invalid_identifiers_are_collected() {
    let zero_pernum = PersonRow::member(3, 0, 30, 1260);
    let mut negative_serial = PersonRow::head(3, 30);
    negative_serial.serial = -1;
    let rows = vec![PersonRow::head(3, 40), zero_pernum, negative_serial];

    match extract(&rows, None) {
        Err(TaxUnitError::DataIntegrity(issues)) => {
            assert_eq!(
                issues,
                vec![
                    IntegrityIssue::InvalidIdentifier {
                        row: 1,
                        column: "pernum",
                        value: Some(0),
                    },
                    IntegrityIssue::InvalidIdentifier {
                        row: 2,
                        column: "serial",
                        value: Some(-1),
                    },
                ]
            );
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn test_negative_pointer_is_invalid() {
    let mut row = PersonRow::member(4, 2, 10, 301);
    row.momloc = -3;
    match extract(&[PersonRow::head(4, 40), row], None) {
        Err(TaxUnitError::DataIntegrity(issues)) => assert_eq!(
            issues,
            vec![IntegrityIssue::InvalidPointer {
                serial: 4,
                pernum: 2,
                column: "momloc",
                value: -3,
            }]
        ),
        other => panic!("expected integrity error, got {other:?}"),
    }
}
