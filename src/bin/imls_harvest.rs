use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use imls_harvest::app::{HarvestSummary, Harvester};
use imls_harvest::config::ConfigLoader;
use imls_harvest::error::HarvestError;
use imls_harvest::fetcher::HttpFetcher;
use imls_harvest::output::JsonOutput;
use imls_harvest::run_log::RunLog;

#[derive(Parser)]
#[command(name = "imls-harvest")]
#[command(about = "Download every resource listed in the data.gov IMLS catalog export")]
#[command(version, author)]
struct Cli {
    /// JSON config file (defaults to ./imls-harvest.json when present)
    #[arg(long)]
    config: Option<String>,

    /// Output root holding the catalog, the log and one directory per record
    #[arg(long)]
    root: Option<Utf8PathBuf>,

    /// Catalog file name inside the output root
    #[arg(long)]
    catalog: Option<String>,

    /// Seconds to wait before each resource download
    #[arg(long)]
    cooldown_secs: Option<u64>,

    /// Name the log file log-<timestamp>.txt instead of log.txt
    #[arg(long)]
    timestamped_log: bool,

    /// Print the run summary as JSON when the harvest completes
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<HarvestError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HarvestError) -> u8 {
    match error {
        HarvestError::CatalogUnreadable(_) | HarvestError::CatalogMalformed(_) => 2,
        HarvestError::MissingExtras(_) | HarvestError::MissingResources(_) => 3,
        HarvestError::HttpClient(_) => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_file = catalog;
    }
    if let Some(secs) = cli.cooldown_secs {
        config.cooldown = std::time::Duration::from_secs(secs);
    }
    if cli.timestamped_log {
        config.use_timestamped_log();
    }

    let log_path = config.log_path();
    let mut log = match RunLog::open(log_path.as_std_path()) {
        Ok(log) => log,
        Err(err) => {
            println!("Error: Could not write to file: {log_path}");
            println!("Exiting");
            return Err(err.into());
        }
    };

    let fetcher = HttpFetcher::new()?;
    let harvester = Harvester::new(config, fetcher);
    let result = harvester.run(&mut log);
    let summary = finish(result, log.close())?;
    if cli.json {
        JsonOutput::print_summary(&summary).into_diagnostic()?;
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// A harvest failure wins over a failure to flush the run log.
fn finish(
    result: Result<HarvestSummary, HarvestError>,
    closed: std::io::Result<()>,
) -> miette::Result<HarvestSummary> {
    let summary = result?;
    closed.into_diagnostic()?;
    Ok(summary)
}

fn print_summary(summary: &HarvestSummary) {
    println!(
        "{} records: {} downloaded ({} bytes), {} failed, {} skipped",
        summary.records.len(),
        summary.downloaded,
        summary.bytes,
        summary.failed,
        summary.skipped
    );
}
