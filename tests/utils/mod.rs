use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use asec_taxunits::PipelineConfig;
use asec_taxunits::schema::asec::{CLEANING_RULES, CleaningRule};

/// One raw extract row; pointers use the survey's `0` for "none"
#[derive(Debug, Clone)]
pub struct PersonRow {
    pub year: i64,
    pub serial: i64,
    pub pernum: i64,
    pub age: i32,
    pub sex: i64,
    pub relate: i64,
    pub depstat: i64,
    pub momloc: i64,
    pub poploc: i64,
    pub sploc: i64,
    pub schlcoll: i64,
    pub incomes: Vec<(&'static str, Option<i64>)>,
}

impl PersonRow {
    /// Household reference person with no pointers and no income
    #[must_use]
    pub fn head(serial: i64, age: i32) -> Self {
        Self {
            year: 2018,
            serial,
            pernum: 1,
            age,
            sex: 1,
            relate: 101,
            depstat: 0,
            momloc: 0,
            poploc: 0,
            sploc: 0,
            schlcoll: 0,
            incomes: Vec::new(),
        }
    }

    /// Another household member
    #[must_use]
    pub fn member(serial: i64, pernum: i64, age: i32, relate: i64) -> Self {
        Self {
            pernum,
            relate,
            ..Self::head(serial, age)
        }
    }

    #[must_use]
    pub fn in_year(mut self, year: i64) -> Self {
        self.year = year;
        self
    }

    #[must_use]
    pub fn spouse_of(mut self, pernum: i64) -> Self {
        self.sploc = pernum;
        self
    }

    #[must_use]
    pub fn child_of(mut self, mother: i64, father: i64) -> Self {
        self.momloc = mother;
        self.poploc = father;
        self.depstat = if mother > 0 { mother } else { father };
        self
    }

    #[must_use]
    pub fn dependent_of(mut self, pernum: i64) -> Self {
        self.depstat = pernum;
        self
    }

    #[must_use]
    pub fn enrolled(mut self) -> Self {
        self.schlcoll = 1;
        self
    }

    #[must_use]
    pub fn income(mut self, column: &'static str, value: Option<i64>) -> Self {
        self.incomes.push((column, value));
        self
    }

    fn income_value(&self, column: &str) -> Option<i64> {
        self.incomes
            .iter()
            .rev()
            .find(|(name, _)| *name == column)
            .map_or(Some(0), |(_, value)| *value)
    }
}

fn int_column(rows: &[PersonRow], f: impl Fn(&PersonRow) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
}

/// Build an extract batch with upper-case IPUMS column names
///
/// Age is stored as `Int32` and everything else as `Int64`, like a typical
/// parquet export of an IPUMS CSV. The optional `PROPTAX` column is left out.
#[must_use]
pub fn person_batch(rows: &[PersonRow]) -> RecordBatch {
    let mut fields = vec![
        Field::new("YEAR", DataType::Int64, false),
        Field::new("SERIAL", DataType::Int64, false),
        Field::new("PERNUM", DataType::Int64, false),
        Field::new("AGE", DataType::Int32, false),
        Field::new("SEX", DataType::Int64, false),
        Field::new("RELATE", DataType::Int64, false),
        Field::new("DEPSTAT", DataType::Int64, false),
        Field::new("MOMLOC", DataType::Int64, false),
        Field::new("POPLOC", DataType::Int64, false),
        Field::new("SPLOC", DataType::Int64, false),
        Field::new("SCHLCOLL", DataType::Int64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        int_column(rows, |r| r.year),
        int_column(rows, |r| r.serial),
        int_column(rows, |r| r.pernum),
        Arc::new(Int32Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        int_column(rows, |r| r.sex),
        int_column(rows, |r| r.relate),
        int_column(rows, |r| r.depstat),
        int_column(rows, |r| r.momloc),
        int_column(rows, |r| r.poploc),
        int_column(rows, |r| r.sploc),
        int_column(rows, |r| r.schlcoll),
    ];

    for rule in CLEANING_RULES
        .iter()
        .filter(|r| r.required && r.rule == CleaningRule::MissingCodesToZero)
    {
        fields.push(Field::new(rule.name.to_uppercase(), DataType::Int64, true));
        columns.push(Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| r.income_value(rule.name))
                .collect::<Vec<_>>(),
        )));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

/// Remove a column from a batch
#[must_use]
pub fn without_column(batch: &RecordBatch, name: &str) -> RecordBatch {
    let idx = batch.schema().index_of(name).unwrap();
    let mut batch = batch.clone();
    batch.remove_column(idx);
    batch
}

/// Strict configuration used by most tests
#[must_use]
pub fn test_config() -> PipelineConfig {
    PipelineConfig::default()
}
