//! Score distribution histogram.
//!
//! Ten equal-width buckets across `[0, upper]`. Each bucket is half-open
//! except the last, which also takes scores equal to `upper`.

use serde::Serialize;
use std::fmt::Write;

use crate::types::ScoreRecord;

pub const NUM_BUCKETS: usize = 10;

/// One bar of the histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    pub upper: f64,
    pub buckets: Vec<HistogramBucket>,
}

impl ScoreHistogram {
    pub fn from_records(records: &[ScoreRecord], upper: i64) -> Self {
        let scores: Vec<u32> = records.iter().map(|r| r.score).collect();
        Self::from_scores(&scores, upper)
    }

    pub fn from_scores(scores: &[u32], upper: i64) -> Self {
        let upper = upper.max(1) as f64;
        let width = upper / NUM_BUCKETS as f64;

        let mut buckets: Vec<HistogramBucket> = (0..NUM_BUCKETS)
            .map(|i| HistogramBucket {
                start: i as f64 * width,
                end: (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for &score in scores {
            let s = f64::from(score);
            if s > upper {
                continue;
            }
            let idx = ((s / width) as usize).min(NUM_BUCKETS - 1);
            buckets[idx].count += 1;
        }

        Self { upper, buckets }
    }

    /// Number of scores that landed in a bucket.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

const TEXT_BAR_WIDTH: usize = 40;

/// One line per bucket, bars scaled to the fullest bucket.
pub fn render_text(histogram: &ScoreHistogram) -> String {
    let max = histogram.max_count();
    let last = histogram.buckets.len().saturating_sub(1);
    let mut out = String::new();

    for (i, b) in histogram.buckets.iter().enumerate() {
        let bar_len = if max == 0 { 0 } else { b.count * TEXT_BAR_WIDTH / max };
        let close = if i == last { ']' } else { ')' };
        let _ = writeln!(
            out,
            "[{:>4.0}, {:>4.0}{close} {:<width$} {}",
            b.start,
            b.end,
            "█".repeat(bar_len),
            b.count,
            width = TEXT_BAR_WIDTH,
        );
    }

    out
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

const SVG_WIDTH: f64 = 1000.0;
const SVG_HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const BAR_FILL: &str = "#1f77b4";

/// Tick spacing of 1, 2 or 5 × 10^n giving roughly five ticks.
fn nice_step(max: usize) -> usize {
    if max <= 5 {
        return 1;
    }
    let raw = max as f64 / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        r if r <= 1.0 => 1.0,
        r if r <= 2.0 => 2.0,
        r if r <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;
    (step as usize).max(1)
}

/// Bar chart of the distribution as a standalone SVG document.
pub fn render_svg(histogram: &ScoreHistogram) -> String {
    let plot_w = SVG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = SVG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bottom = MARGIN_TOP + plot_h;

    let step = nice_step(histogram.max_count());
    let y_max = (histogram.max_count().div_ceil(step).max(1) * step) as f64;
    let x = |v: f64| MARGIN_LEFT + v / histogram.upper * plot_w;
    let y = |v: f64| bottom - v / y_max * plot_h;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    // Horizontal grid + y ticks
    let mut tick = 0;
    while tick as f64 <= y_max {
        let ty = y(tick as f64);
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{ty:.1}" x2="{:.1}" y2="{ty:.1}" stroke="#b0b0b0" stroke-opacity="0.75"/>"##,
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{tick}</text>"#,
            MARGIN_LEFT - 8.0,
            ty + 4.0
        );
        tick += step;
    }

    // Bars
    for b in &histogram.buckets {
        let x0 = x(b.start);
        let x1 = x(b.end);
        let top = y(b.count as f64);
        let _ = writeln!(
            svg,
            r#"<rect x="{x0:.1}" y="{top:.1}" width="{:.1}" height="{:.1}" fill="{BAR_FILL}" stroke="black"><title>{:.0}–{:.0}: {}</title></rect>"#,
            x1 - x0,
            bottom - top,
            b.start,
            b.end,
            b.count
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{bottom}" x2="{:.1}" y2="{bottom}" stroke="black"/>"#,
        MARGIN_LEFT + plot_w
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom}" stroke="black"/>"#
    );

    // X ticks at every bucket edge
    let width = histogram.upper / NUM_BUCKETS as f64;
    for i in 0..=NUM_BUCKETS {
        let v = i as f64 * width;
        let tx = x(v);
        let _ = writeln!(
            svg,
            r#"<line x1="{tx:.1}" y1="{bottom}" x2="{tx:.1}" y2="{:.1}" stroke="black"/>"#,
            bottom + 5.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{tx:.1}" y="{:.1}" font-size="12" text-anchor="middle">{v:.0}</text>"#,
            bottom + 20.0
        );
    }

    // Labels
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="35" font-size="18" text-anchor="middle">Wallet Score Distribution</text>"#,
        MARGIN_LEFT + plot_w / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">Credit Score</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        SVG_HEIGHT - 20.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {:.1})">Number of Wallets</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    );

    svg.push_str("</svg>\n");
    svg
}
