//! Arrow data handling utilities
//!
//! Typed access to columns of a record batch with the casting the ASEC
//! extracts need (CSV and parquet exports disagree on integer widths).

pub mod array_utils;

pub use array_utils::{
    append_new_columns, column_as_i64, concat_nullable, downcast_array, get_column,
    optional_column_as_i64, replace_columns,
};
