//! Batch run: load → group → score → report.
//!
//! Wallets are independent, so scoring fans out over rayon workers; the
//! collected records keep grouping order either way.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::clock::Clock;
use crate::config::OutputConfig;
use crate::ingest::{self, WalletGroups};
use crate::report::{self, ScoreHistogram};
use crate::scoring::ScoreEngine;
use crate::types::{ScoreRecord, ScoringError};

/// Score every wallet group. `parallel` only changes how, never what.
pub fn score_wallets(
    engine: &ScoreEngine,
    groups: &WalletGroups,
    clock: &dyn Clock,
    parallel: bool,
) -> Vec<ScoreRecord> {
    if parallel {
        groups
            .as_slice()
            .par_iter()
            .map(|(wallet, txs)| engine.score(wallet, txs, clock))
            .collect()
    } else {
        groups
            .iter()
            .map(|(wallet, txs)| engine.score(wallet, txs, clock))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub transactions: usize,
    pub records: Vec<ScoreRecord>,
    pub histogram: ScoreHistogram,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
}

impl RunSummary {
    pub fn wallets(&self) -> usize {
        self.records.len()
    }

    /// Mean score across wallets, 0 for an empty run.
    pub fn mean_score(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| f64::from(r.score)).sum::<f64>() / self.records.len() as f64
    }
}

/// Run the whole batch. Input is fully loaded and scored before anything
/// is written, so an input error leaves the output directory untouched.
pub fn run(
    input: &Path,
    output_dir: &Path,
    engine: &ScoreEngine,
    output: &OutputConfig,
    clock: &dyn Clock,
    parallel: bool,
) -> Result<RunSummary, ScoringError> {
    let transactions = ingest::load_transactions(input)?;
    let transaction_count = transactions.len();
    let groups = ingest::group_by_wallet(transactions);

    let records = score_wallets(engine, &groups, clock, parallel);
    info!(wallets = records.len(), parallel, "Wallets scored");

    std::fs::create_dir_all(output_dir).map_err(|e| ScoringError::Output {
        path: output_dir.display().to_string(),
        message: format!("failed to create output directory: {e}"),
    })?;

    let csv_path = output_dir.join(&output.scores_file);
    report::write_scores_csv(&records, &csv_path)?;

    let histogram = ScoreHistogram::from_records(&records, engine.config().max_score);
    let chart_path = output_dir.join(&output.chart_file);
    report::write_histogram_svg(&histogram, &chart_path)?;

    Ok(RunSummary {
        transactions: transaction_count,
        records,
        histogram,
        csv_path,
        chart_path,
    })
}
