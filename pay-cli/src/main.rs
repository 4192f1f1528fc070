use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pay_cli::{Command, app};
use pay_core::db::StoreConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Household paycheck and contribution planner.
///
/// Loads household profiles and reference data from the configured store
/// and prints take-home pay, contribution room or household totals.
#[derive(Debug, Parser)]
#[command(name = "paycheck", version)]
struct Cli {
    /// Storage backend to use (`files` or `memory`).
    #[arg(long, default_value = "files")]
    backend: String,

    /// Store location. For `files` this is the household directory.
    #[arg(long, default_value = "household")]
    store: String,

    /// Tax year to report on. Defaults to the year of `--today`.
    #[arg(long)]
    year: Option<i32>,

    /// Date to report as of (YYYY-MM-DD). Defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let store_config = StoreConfig {
        backend: cli.backend,
        location: cli.store,
    };

    debug!("opening {} backend", store_config.backend);
    let registry = app::build_registry();
    let repo = registry.create(&store_config).await?;

    let as_of = app::resolve_as_of(cli.year, cli.today, Local::now().date_naive())?;
    let output = app::run(&*repo, &cli.command, as_of).await?;
    print!("{output}");

    Ok(())
}
