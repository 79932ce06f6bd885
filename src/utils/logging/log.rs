//! Log lines for table I/O and pipeline stages

use std::path::Path;
use std::time::Duration;

pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Log a finished file operation
///
/// `count` is in `unit`s, e.g. batches read or files found.
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    count: usize,
    unit: &str,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(elapsed) => log::info!(
            "{operation} {count} {unit} ({}) in {elapsed:?}",
            path.display()
        ),
        None => log::info!("{operation} {count} {unit} ({})", path.display()),
    }
}

/// Log the end of an in-memory pipeline stage
pub fn log_stage_complete(stage: &str, rows_in: usize, rows_out: usize, elapsed: Duration) {
    log::info!("{stage}: {rows_in} rows in, {rows_out} rows out ({elapsed:?})");
}

pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
