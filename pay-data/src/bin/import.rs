use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pay_core::PayrollRepository;
use pay_data::{FileRepository, PerformanceLoader};
use tracing_subscriber::EnvFilter;

/// Import year-to-date account contributions into a file store.
///
/// The CSV file should have the following columns:
/// - year: The calendar year the contributions belong to (e.g., 2025)
/// - account_type: traditional_401k, roth_401k, traditional_ira, roth_ira,
///   hsa, espp or brokerage (case-insensitive)
/// - account_name: Name of the account (e.g., "Fidelity 401k")
/// - owner: Household member name, or "Joint"
/// - contributions: Employee contributions so far this year
/// - employer_match: Employer money so far this year (may be empty)
///
/// Rows replace any stored record with the same year, account type,
/// account name and owner.
#[derive(Parser, Debug)]
#[command(name = "pay-data-import")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing contribution records
    #[arg(short, long)]
    file: PathBuf,

    /// Store directory (created if missing)
    #[arg(short, long, default_value = "household")]
    store: PathBuf,

    /// Parse and report without writing anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Reading contributions from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = PerformanceLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    if args.dry_run {
        for record in &records {
            println!(
                "  {} {} {:<24} {:<10} {:>12} {:>12}",
                record.year,
                record.account_type,
                record.account_name,
                record.owner,
                record.contributions,
                record.employer_match
            );
        }
        return Ok(());
    }

    let repo = FileRepository::open(&args.store)
        .await
        .with_context(|| format!("Failed to open store: {}", args.store.display()))?;

    for record in &records {
        repo.upsert_performance_record(record)
            .await
            .with_context(|| {
                format!(
                    "Failed to store {} record '{}' for {}",
                    record.account_type, record.account_name, record.owner
                )
            })?;
    }

    println!(
        "Successfully imported {} records into {}.",
        records.len(),
        repo.root().display()
    );

    Ok(())
}
