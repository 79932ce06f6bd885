//! Utilities shared by the pipeline stages
//!
//! Arrow column access, table I/O, and logging/progress helpers.

pub mod arrow;
pub mod io;
pub mod logging;

pub use io::{DEFAULT_BATCH_SIZE, TableFormat, read_table, write_table};
