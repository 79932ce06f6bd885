//! Tests for the Arrow layout of tax units using `serde_arrow`

use arrow::array::AsArray;
use arrow::datatypes::{DataType, Int64Type};
use asec_taxunits::schema::taxcalc::{
    AGE_SPOUSE, E00200P, E00200S, EIC, FILER_PERNUM, FLPDYR, MARS, RECID, XTOT,
};
use asec_taxunits::{ArrowRows, TaxUnit};

fn unit(taxid: i64, wages: i64) -> TaxUnit {
    let mut unit = TaxUnit {
        year: 2018,
        serial: taxid / 100,
        filer_pernum: 1,
        taxid,
        xtot: 3,
        e00200: wages,
        e00200p: wages,
        age_head: 41,
        num_dependents: 1,
        num_eic_qualified: 1,
        ..Default::default()
    };
    unit.finalize(3);
    unit
}

#[test]
fn test_schema_uses_taxcalc_names() {
    let schema = TaxUnit::schema().expect("schema");
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();

    assert_eq!(&names[..4], [RECID, FLPDYR, "serial", FILER_PERNUM]);
    for name in [MARS, EIC, XTOT, E00200S, "p23250", "e18500", AGE_SPOUSE] {
        assert!(names.contains(&name), "schema should contain {name}");
    }
    assert!(!names.contains(&"num_eic_qualified"));
    assert_eq!(
        schema.field_with_name(RECID).unwrap().data_type(),
        &DataType::Int64
    );
}

#[test]
fn test_record_batch_values() {
    let units = vec![unit(701, 30_000), unit(1203, 0)];
    let batch = TaxUnit::to_record_batch(&units).expect("record batch");
    assert_eq!(batch.num_rows(), 2);

    let recid = batch.column_by_name(RECID).unwrap().as_primitive::<Int64Type>();
    assert_eq!(recid.value(0), 2_018_000_000_701);
    assert_eq!(recid.value(1), 2_018_000_001_203);

    let wages = batch.column_by_name(E00200P).unwrap().as_primitive::<Int64Type>();
    assert_eq!(wages.value(0), 30_000);

    let back = TaxUnit::from_record_batch(&batch).expect("read back");
    assert_eq!(back[0].mars, 4);
    assert_eq!(back[0].eic, 1);
    // Bookkeeping counters are not part of the output.
    assert_eq!(back[0].num_dependents, 0);
}

#[test]
fn test_empty_units_keep_schema() {
    let batch = TaxUnit::to_record_batch(&[]).expect("empty batch");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema().as_ref(), &TaxUnit::schema().unwrap());
}
