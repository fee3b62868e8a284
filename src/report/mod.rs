//! Output artifacts: the per-wallet score table and the distribution chart.

pub mod histogram;

pub use histogram::{render_svg, render_text, HistogramBucket, ScoreHistogram};

use std::path::Path;
use tracing::info;

use crate::types::{ScoreRecord, ScoringError};

fn output_error(path: &Path, message: String) -> ScoringError {
    ScoringError::Output {
        path: path.display().to_string(),
        message,
    }
}

/// Write `wallet,score` rows to `path`. The header is always written, even
/// when there are no records.
pub fn write_scores_csv(records: &[ScoreRecord], path: &Path) -> Result<(), ScoringError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| output_error(path, format!("failed to create CSV: {e}")))?;

    wtr.write_record(["wallet", "score"])
        .map_err(|e| output_error(path, format!("failed to write CSV header: {e}")))?;
    for record in records {
        wtr.serialize(record)
            .map_err(|e| output_error(path, format!("failed to write row for {}: {e}", record.wallet)))?;
    }
    wtr.flush()
        .map_err(|e| output_error(path, format!("failed to flush CSV: {e}")))?;

    info!(path = %path.display(), rows = records.len(), "Saved scores");
    Ok(())
}

/// Render the histogram as SVG and write it to `path`.
pub fn write_histogram_svg(histogram: &ScoreHistogram, path: &Path) -> Result<(), ScoringError> {
    std::fs::write(path, render_svg(histogram))
        .map_err(|e| output_error(path, format!("failed to write chart: {e}")))?;

    info!(path = %path.display(), wallets = histogram.total(), "Saved score distribution chart");
    Ok(())
}
