//! Configuration for the tax-unit pipeline.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TaxUnitError};
use crate::utils::io::DEFAULT_BATCH_SIZE;

/// Environment variable overriding the tax year
pub const ENV_TAX_YEAR: &str = "TAXUNITS_TAX_YEAR";
/// Environment variable selecting `strict` or `lenient` integrity handling
pub const ENV_INTEGRITY: &str = "TAXUNITS_INTEGRITY";
/// Environment variable overriding the reader batch size
pub const ENV_BATCH_SIZE: &str = "TAXUNITS_BATCH_SIZE";

/// What to do when rows violate a household or tax-unit invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrityMode {
    /// Abort the run on the first stage that finds an error-level issue
    #[default]
    Strict,
    /// Log error-level issues and keep every row
    Lenient,
}

impl FromStr for IntegrityMode {
    type Err = TaxUnitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(TaxUnitError::Config(format!(
                "unknown integrity mode '{other}', expected 'strict' or 'lenient'"
            ))),
        }
    }
}

impl fmt::Display for IntegrityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

/// Configuration for the tax-unit pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tax year stamped on every record; required when the extract has no `year` column
    pub tax_year: Option<i32>,
    /// Handling of data-integrity errors
    pub integrity: IntegrityMode,
    /// Rows per batch when reading extracts
    pub batch_size: usize,
    /// Cap on the earned-income-credit qualifying child count
    pub max_eic_children: i64,
    /// Whether to draw progress bars (binary only)
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tax_year: None,
            integrity: IntegrityMode::Strict,
            batch_size: DEFAULT_BATCH_SIZE,
            max_eic_children: 3,
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with the `TAXUNITS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(year) = lookup(ENV_TAX_YEAR) {
            let year = year.trim().parse::<i32>().map_err(|e| {
                TaxUnitError::Config(format!("{ENV_TAX_YEAR}='{year}' is not a year: {e}"))
            })?;
            self.tax_year = Some(year);
        }

        if let Some(mode) = lookup(ENV_INTEGRITY) {
            self.integrity = mode.parse()?;
        }

        if let Some(size) = lookup(ENV_BATCH_SIZE) {
            self.batch_size = size
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    TaxUnitError::Config(format!(
                        "{ENV_BATCH_SIZE}='{size}' is not a positive integer"
                    ))
                })?;
        }

        Ok(self)
    }

    #[must_use]
    pub fn with_tax_year(mut self, year: i32) -> Self {
        self.tax_year = Some(year);
        self
    }

    #[must_use]
    pub fn with_integrity(mut self, integrity: IntegrityMode) -> Self {
        self.integrity = integrity;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        match self.tax_year {
            Some(year) => writeln!(f, "  Tax Year: {year}")?,
            None => writeln!(f, "  Tax Year: from 'year' column")?,
        }
        writeln!(f, "  Integrity Mode: {}", self.integrity)?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(f, "  Max EIC Children: {}", self.max_eic_children)?;
        Ok(())
    }
}
