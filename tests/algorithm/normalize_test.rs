//! Tests for missing-value normalization

use arrow::array::{Array, Int64Array};
use arrow::datatypes::DataType;
use asec_taxunits::TaxUnitError;
use asec_taxunits::algorithm::normalize_batch;
use asec_taxunits::schema::asec::{CLEANING_RULES, CleaningRule, MISSING_CODES};

use crate::utils::{PersonRow, person_batch, without_column};

fn int64<'a>(batch: &'a arrow::record_batch::RecordBatch, name: &str) -> &'a Int64Array {
    batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap()
}

#[test]
fn test_sentinel_income_becomes_zero() {
    let rows = vec![
        PersonRow::head(1, 40).income("incwage", Some(9999)),
        PersonRow::member(1, 2, 38, 201).income("incwage", Some(42_000)),
        PersonRow::member(1, 3, 12, 301).income("incwage", None),
    ];
    let batch = normalize_batch(&person_batch(&rows)).unwrap();

    let wages = int64(&batch, "incwage");
    assert_eq!(wages.null_count(), 0);
    assert_eq!(wages.value(0), 0);
    assert_eq!(wages.value(1), 42_000);
    assert_eq!(wages.value(2), 0);
}

#[test]
fn test_no_missing_code_survives() {
    let rows: Vec<PersonRow> = MISSING_CODES
        .iter()
        .enumerate()
        .map(|(i, code)| {
            PersonRow::member(1, i as i64 + 1, 30, 1260)
                .income("incint", Some(*code))
                .income("fedtax", Some(*code))
        })
        .collect();
    let batch = normalize_batch(&person_batch(&rows)).unwrap();

    for rule in CLEANING_RULES
        .iter()
        .filter(|r| r.rule == CleaningRule::MissingCodesToZero && r.required)
    {
        let column = int64(&batch, rule.name);
        assert_eq!(column.null_count(), 0, "{} has nulls", rule.name);
        assert!(
            column.values().iter().all(|v| !MISSING_CODES.contains(v)),
            "{} still holds a missing code",
            rule.name
        );
    }
}

#[test]
fn test_zero_pointer_becomes_absent() {
    let rows = vec![
        PersonRow::head(5, 40).spouse_of(2),
        PersonRow::member(5, 2, 38, 201).spouse_of(1),
        PersonRow::member(5, 3, 9, 301).child_of(2, 1),
        PersonRow::member(5, 4, 30, 1260),
    ];
    let batch = normalize_batch(&person_batch(&rows)).unwrap();

    let sploc = int64(&batch, "sploc");
    assert_eq!(sploc.value(0), 2);
    assert_eq!(sploc.value(1), 1);
    assert!(sploc.is_null(2));
    assert!(sploc.is_null(3));

    let momloc = int64(&batch, "momloc");
    assert!(momloc.is_null(0));
    assert_eq!(momloc.value(2), 2);
    assert!(batch.schema().field_with_name("momloc").unwrap().is_nullable());
}

#[test]
fn test_other_columns_untouched() {
    let rows = vec![PersonRow::head(1, 0).income("incwage", Some(9999))];
    let input = person_batch(&rows);
    let batch = normalize_batch(&input).unwrap();

    // Age zero is a real age, not an absent pointer.
    let age = batch.column_by_name("age").unwrap();
    assert_eq!(age.data_type(), &DataType::Int32);
    assert_eq!(age.null_count(), 0);
    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.num_columns(), input.num_columns());
    assert!(batch.column_by_name("proptax").is_none());
}

#[test]
fn test_missing_required_column_is_fatal() {
    let batch = without_column(&person_batch(&[PersonRow::head(1, 40)]), "DEPSTAT");
    match normalize_batch(&batch) {
        Err(TaxUnitError::Schema(message)) => assert!(message.contains("depstat")),
        other => panic!("expected schema error, got {other:?}"),
    }
}
