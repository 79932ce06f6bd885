//! File-level pipeline tests using temporary directories

use arrow::array::{Array, AsArray};
use arrow::datatypes::Int64Type;
use asec_taxunits::schema::taxcalc::{E00200, MARS, RECID};
use asec_taxunits::utils::io::{read_table, write_table};
use asec_taxunits::{ArrowRows, TaxUnit, TaxUnitError, TaxUnitPipeline};
use tempfile::tempdir;

use crate::utils::{PersonRow, person_batch, test_config};

fn household() -> Vec<PersonRow> {
    vec![
        PersonRow::head(5, 40)
            .spouse_of(2)
            .income("incwage", Some(50_000)),
        PersonRow::member(5, 2, 38, 201)
            .spouse_of(1)
            .income("incwage", Some(20_000)),
        PersonRow::member(5, 3, 6, 301).child_of(2, 1),
        PersonRow::head(7, 35).income("incwage", Some(9999)),
    ]
}

#[test]
fn test_parquet_in_parquet_out() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("asec.parquet");
    let output = dir.path().join("out").join("tax_units.parquet");
    let persons = dir.path().join("out").join("persons.parquet");
    write_table(&input, &[person_batch(&household())]).unwrap();

    let result = TaxUnitPipeline::new(test_config())
        .run_files(&input, &output, Some(&persons))
        .unwrap();
    assert_eq!(result.tax_units.len(), 2);

    let written = read_table(&output, 1024).unwrap();
    let units: Vec<TaxUnit> = written
        .iter()
        .flat_map(|batch| TaxUnit::from_record_batch(batch).unwrap())
        .collect();
    assert_eq!(units.len(), 2);
    for (read, built) in units.iter().zip(&result.tax_units) {
        assert_eq!(read.recid, built.recid);
        assert_eq!(read.mars, built.mars);
        assert_eq!(read.eic, built.eic);
        assert_eq!(read.e00200, built.e00200);
    }
    assert_eq!(units[0].eic, 1);

    let persons = read_table(&persons, 1024).unwrap();
    assert_eq!(persons.iter().map(|b| b.num_rows()).sum::<usize>(), 4);

    // Cleaned pass-through items and normalized pointers are kept.
    let batch = &persons[0];
    let welfare = batch.column_by_name("incwelfr").unwrap().as_primitive::<Int64Type>();
    assert_eq!(welfare.value(1), 0);
    let sploc = batch.column_by_name("sploc").unwrap().as_primitive::<Int64Type>();
    assert_eq!(sploc.value(0), 2);
    assert!(sploc.is_null(2));
    let momloc = batch.column_by_name("momloc").unwrap().as_primitive::<Int64Type>();
    assert_eq!(momloc.value(2), 2);
    assert!(batch.column_by_name("depstat").is_some());
    assert!(batch.column_by_name("depchild").is_some());
}

#[test]
fn test_csv_in_csv_out() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("asec.csv");
    let output = dir.path().join("tax_units.csv");
    write_table(&input, &[person_batch(&household())]).unwrap();

    TaxUnitPipeline::new(test_config())
        .run_files(&input, &output, None)
        .unwrap();

    let written = read_table(&output, 1024).unwrap();
    assert_eq!(written.len(), 1);
    let batch = &written[0];
    assert_eq!(batch.num_rows(), 2);

    let recid = batch.column_by_name(RECID).unwrap().as_primitive::<Int64Type>();
    assert_eq!(recid.value(0), 2_018_000_000_501);
    let mars = batch.column_by_name(MARS).unwrap().as_primitive::<Int64Type>();
    assert_eq!(mars.value(0), 2);
    assert_eq!(mars.value(1), 1);
    let wages = batch.column_by_name(E00200).unwrap().as_primitive::<Int64Type>();
    assert_eq!(wages.value(0), 70_000);
    assert_eq!(wages.value(1), 0);
}

#[test]
fn test_directory_of_parquet_files() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("extract");
    let rows = household();
    write_table(&input.join("part-0.parquet"), &[person_batch(&rows[..3])]).unwrap();
    write_table(&input.join("part-1.parquet"), &[person_batch(&rows[3..])]).unwrap();

    let output = dir.path().join("tax_units.parquet");
    let result = TaxUnitPipeline::new(test_config())
        .run_files(&input, &output, None)
        .unwrap();
    assert_eq!(
        result.tax_units.iter().map(|u| u.taxid).collect::<Vec<_>>(),
        vec![501, 701]
    );
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("asec.parquet");
    let output = dir.path().join("tax_units.parquet");
    let mut rows = household();
    rows.push(PersonRow::member(5, 3, 30, 1260));
    write_table(&input, &[person_batch(&rows)]).unwrap();

    let result = TaxUnitPipeline::new(test_config()).run_files(&input, &output, None);
    assert!(matches!(result, Err(TaxUnitError::DataIntegrity(_))));
    assert!(!output.exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("asec.dta");
    std::fs::write(&input, b"").unwrap();
    let output = dir.path().join("tax_units.parquet");

    let result = TaxUnitPipeline::new(test_config()).run_files(&input, &output, None);
    assert!(matches!(result, Err(TaxUnitError::IoWithPath { .. })));
}
