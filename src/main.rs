use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use asec_taxunits::{PipelineConfig, TaxUnitPipeline};
use clap::Parser;
use log::info;

/// Build tax-calculator tax units from an IPUMS ASEC person extract
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Person extract: a .parquet or .csv file, or a directory of .parquet files
    input: PathBuf,

    /// Tax-unit output (.parquet or .csv)
    output: PathBuf,

    /// Also write the person-level tax-calculator rows here
    #[arg(long)]
    persons_output: Option<PathBuf>,

    /// Write the integrity report as JSON here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env()
        .context("invalid TAXUNITS_* environment configuration")?
        .with_progress(true);
    info!("{config}");

    let start = Instant::now();
    let output = TaxUnitPipeline::new(config)
        .run_files(&cli.input, &cli.output, cli.persons_output.as_deref())
        .with_context(|| format!("failed to build tax units from {}", cli.input.display()))?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    info!(
        "Wrote {} tax units to {} in {:?}",
        output.tax_units.len(),
        cli.output.display(),
        start.elapsed()
    );
    Ok(())
}
