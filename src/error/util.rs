//! Utility functions for error handling
//!
//! File helpers that attach the path and the reason a file was needed to
//! the error, so a failed run names what it was trying to do.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, TaxUnitError};

/// Open an input file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(TaxUnitError::io_with_path(
            path,
            format!("file not found, needed for: {purpose}"),
        ));
    }

    if !path.is_file() {
        return Err(TaxUnitError::io_with_path(
            path,
            format!("path is not a file, expected a file for: {purpose}"),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "permission denied - check file permissions".to_string(),
            _ => format!("failed to open file for {purpose}: {e}"),
        };
        TaxUnitError::io_with_path(path, context)
    })
}

/// Create (or truncate) an output file, creating missing parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            TaxUnitError::io_with_path(
                parent,
                format!("failed to create output directory for {purpose}: {e}"),
            )
        })?;
    }

    fs::File::create(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "permission denied - check directory permissions".to_string()
            }
            _ => format!("failed to create file for {purpose}: {e}"),
        };
        TaxUnitError::io_with_path(path, context)
    })
}

/// Check if a directory exists and is readable, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(TaxUnitError::io_with_path(
            path,
            format!("directory not found, needed for: {purpose}"),
        ));
    }

    if !path.is_dir() {
        return Err(TaxUnitError::io_with_path(
            path,
            format!("path is not a directory, expected a directory for: {purpose}"),
        ));
    }

    fs::read_dir(path).map(|_| ()).map_err(|e| {
        TaxUnitError::io_with_path(path, format!("failed to access directory for {purpose}: {e}"))
    })
}
