//! WALLETSCORE — Heuristic DeFi Wallet Credit Scoring
//!
//! Entry point. Parses arguments, loads configuration, initialises
//! structured logging, and runs one scoring batch over the input file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use walletscore::clock::SystemClock;
use walletscore::config::{AppConfig, LoggingConfig};
use walletscore::pipeline;
use walletscore::report;
use walletscore::scoring::ScoreEngine;

#[derive(Parser)]
#[command(name = "walletscore", version, about = "DeFi Wallet Credit Scoring System")]
struct Cli {
    /// Path to the wallet transactions JSON export
    input_file: PathBuf,

    /// Directory to save results
    #[arg(long = "output-dir", alias = "output_dir", default_value = ".")]
    output_dir: PathBuf,

    /// Optional TOML file overriding scoring rules and output names
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Score wallets on the calling thread only
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let cfg = AppConfig::load_or_default(cli.config.as_deref())?;

    init_logging(&cfg.logging);

    info!(
        input = %cli.input_file.display(),
        output_dir = %cli.output_dir.display(),
        config = ?cli.config,
        parallel = !cli.sequential,
        "WALLETSCORE starting"
    );

    let engine = ScoreEngine::new(cfg.scoring.clone())?;
    let summary = pipeline::run(
        &cli.input_file,
        &cli.output_dir,
        &engine,
        &cfg.output,
        &SystemClock,
        !cli.sequential,
    )
    .with_context(|| format!("Scoring run failed for {}", cli.input_file.display()))?;

    for line in report::render_text(&summary.histogram).lines() {
        info!("{line}");
    }

    info!(
        transactions = summary.transactions,
        wallets = summary.wallets(),
        mean_score = format!("{:.1}", summary.mean_score()),
        scores = %summary.csv_path.display(),
        chart = %summary.chart_path.display(),
        "WALLETSCORE finished"
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.filter));

    let json_logging = cfg.json || std::env::var("WALLETSCORE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
