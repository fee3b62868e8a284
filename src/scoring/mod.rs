//! Credit scoring engine.
//!
//! Turns one wallet's transaction history into a bounded integer score:
//! aggregate (`metrics`) → apply tiered rules → clamp. Rule thresholds and
//! point values live in `ScoringConfig`; defaults reproduce the reference
//! heuristic and can be overridden from `config.toml`.

pub mod coerce;
pub mod metrics;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::types::{ScoreRecord, ScoringError, Transaction};
use metrics::WalletMetrics;

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// A "strictly above `above` → `points`" step. Within a tier list only the
/// highest threshold that is exceeded pays out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub above: f64,
    pub points: i64,
}

impl Tier {
    pub const fn new(above: f64, points: i64) -> Self {
        Self { above, points }
    }
}

/// Points awarded by the highest exceeded tier, or 0.
fn tier_points(tiers: &[Tier], value: f64) -> i64 {
    tiers
        .iter()
        .filter(|t| value > t.above)
        .max_by(|a, b| a.above.total_cmp(&b.above))
        .map(|t| t.points)
        .unwrap_or(0)
}

/// Rule constants for the scoring heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_score: i64,
    pub min_score: i64,
    pub max_score: i64,
    /// Total deposited USD.
    pub deposit_tiers: Vec<Tier>,
    /// Days since the earliest transaction.
    pub wallet_age_tiers: Vec<Tier>,
    /// Number of transactions.
    pub transaction_count_tiers: Vec<Tier>,
    /// LTV strictly below this earns `ltv_low_points`.
    pub ltv_low_below: f64,
    pub ltv_low_points: i64,
    /// Otherwise, LTV strictly below this earns `ltv_moderate_points`.
    pub ltv_moderate_below: f64,
    pub ltv_moderate_points: i64,
    /// Otherwise, LTV at or above this earns `ltv_high_points` (a penalty).
    pub ltv_high_at_or_above: f64,
    pub ltv_high_points: i64,
    pub repay_full_at_or_above: f64,
    pub repay_full_points: i64,
    pub repay_partial_at_or_above: f64,
    pub repay_partial_points: i64,
    /// Applied to every other repayment ratio, including wallets that never
    /// borrowed (ratio 0).
    pub repay_shortfall_points: i64,
    pub liquidation_penalty: i64,
    /// Mean seconds between transactions below which activity looks automated.
    pub bot_mean_interval_secs: f64,
    pub bot_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 500,
            min_score: 0,
            max_score: 1000,
            deposit_tiers: vec![
                Tier::new(100_000.0, 150),
                Tier::new(10_000.0, 100),
                Tier::new(1_000.0, 50),
            ],
            wallet_age_tiers: vec![Tier::new(365.0, 100), Tier::new(180.0, 50)],
            transaction_count_tiers: vec![Tier::new(100.0, 100), Tier::new(50.0, 50)],
            ltv_low_below: 0.25,
            ltv_low_points: 200,
            ltv_moderate_below: 0.5,
            ltv_moderate_points: 100,
            ltv_high_at_or_above: 0.75,
            ltv_high_points: -100,
            repay_full_at_or_above: 1.0,
            repay_full_points: 200,
            repay_partial_at_or_above: 0.8,
            repay_partial_points: 100,
            repay_shortfall_points: -50,
            liquidation_penalty: 250,
            bot_mean_interval_secs: 60.0,
            bot_penalty: 100,
        }
    }
}

impl ScoringConfig {
    /// Reject configurations the engine can't apply sensibly.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.min_score < 0 || self.min_score > self.max_score {
            return Err(ScoringError::Config(format!(
                "score bounds must satisfy 0 <= min <= max, got [{}, {}]",
                self.min_score, self.max_score
            )));
        }

        let thresholds = self
            .deposit_tiers
            .iter()
            .chain(&self.wallet_age_tiers)
            .chain(&self.transaction_count_tiers)
            .map(|t| t.above)
            .chain([
                self.ltv_low_below,
                self.ltv_moderate_below,
                self.ltv_high_at_or_above,
                self.repay_full_at_or_above,
                self.repay_partial_at_or_above,
                self.bot_mean_interval_secs,
            ]);
        if thresholds.into_iter().any(|t| !t.is_finite()) {
            return Err(ScoringError::Config("scoring thresholds must be finite".into()));
        }

        if self.ltv_low_below > self.ltv_moderate_below {
            return Err(ScoringError::Config(format!(
                "ltv_low_below ({}) must not exceed ltv_moderate_below ({})",
                self.ltv_low_below, self.ltv_moderate_below
            )));
        }
        if self.repay_partial_at_or_above > self.repay_full_at_or_above {
            return Err(ScoringError::Config(format!(
                "repay_partial_at_or_above ({}) must not exceed repay_full_at_or_above ({})",
                self.repay_partial_at_or_above, self.repay_full_at_or_above
            )));
        }
        if self.liquidation_penalty < 0 || self.bot_penalty < 0 {
            return Err(ScoringError::Config("penalties must be non-negative".into()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Score breakdown
// ---------------------------------------------------------------------------

/// Signed contribution of each rule, plus the raw and clamped totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: i64,
    pub deposit_volume: i64,
    pub wallet_age: i64,
    pub loan_to_value: i64,
    pub repayment: i64,
    pub liquidations: i64,
    pub transaction_count: i64,
    pub bot_cadence: i64,
    /// Sum of all contributions before clamping.
    pub raw: i64,
    pub score: u32,
}

/// Everything the engine worked out for one wallet.
#[derive(Debug, Clone)]
pub struct WalletAssessment {
    pub wallet: String,
    pub metrics: WalletMetrics,
    pub breakdown: ScoreBreakdown,
}

impl WalletAssessment {
    pub fn record(&self) -> ScoreRecord {
        ScoreRecord {
            wallet: self.wallet.clone(),
            score: self.breakdown.score,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Applies the scoring rules. Holds no per-wallet state, so one engine can
/// be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    /// Build an engine, rejecting configurations `apply_rules` can't clamp
    /// against.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the scoring configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one wallet. Never fails: malformed amounts count as zero.
    pub fn score(&self, wallet: &str, transactions: &[Transaction], clock: &dyn Clock) -> ScoreRecord {
        self.assess(wallet, transactions, clock).record()
    }

    /// Score one wallet and keep the intermediate numbers.
    pub fn assess(&self, wallet: &str, transactions: &[Transaction], clock: &dyn Clock) -> WalletAssessment {
        let metrics = WalletMetrics::from_transactions(transactions, clock.now_unix());
        let breakdown = self.apply_rules(&metrics);

        debug!(
            wallet,
            transactions = metrics.transaction_count,
            deposits_usd = format!("{:.2}", metrics.total_deposits_usd),
            borrows_usd = format!("{:.2}", metrics.total_borrows_usd),
            repays_usd = format!("{:.2}", metrics.total_repays_usd),
            liquidations = metrics.liquidation_count,
            age_days = format!("{:.1}", metrics.wallet_age_days),
            raw = breakdown.raw,
            score = breakdown.score,
            "Wallet scored"
        );

        WalletAssessment {
            wallet: wallet.to_string(),
            metrics,
            breakdown,
        }
    }

    /// Run every rule over pre-aggregated metrics.
    pub fn apply_rules(&self, metrics: &WalletMetrics) -> ScoreBreakdown {
        let cfg = &self.config;

        let mut b = ScoreBreakdown {
            base: cfg.base_score,
            deposit_volume: tier_points(&cfg.deposit_tiers, metrics.total_deposits_usd),
            wallet_age: tier_points(&cfg.wallet_age_tiers, metrics.wallet_age_days),
            loan_to_value: self.ltv_points(metrics.loan_to_value()),
            repayment: self.repayment_points(metrics.repayment_ratio()),
            liquidations: -cfg.liquidation_penalty * i64::from(metrics.liquidation_count),
            transaction_count: tier_points(&cfg.transaction_count_tiers, metrics.transaction_count as f64),
            bot_cadence: match metrics.mean_interval_secs {
                Some(mean) if mean < cfg.bot_mean_interval_secs => -cfg.bot_penalty,
                _ => 0,
            },
            ..Default::default()
        };

        b.raw = b.base
            + b.deposit_volume
            + b.wallet_age
            + b.loan_to_value
            + b.repayment
            + b.liquidations
            + b.transaction_count
            + b.bot_cadence;
        // new() validated 0 <= min_score <= max_score.
        b.score = b.raw.clamp(cfg.min_score, cfg.max_score) as u32;

        b
    }

    fn ltv_points(&self, ltv: f64) -> i64 {
        let cfg = &self.config;
        if ltv < cfg.ltv_low_below {
            cfg.ltv_low_points
        } else if ltv < cfg.ltv_moderate_below {
            cfg.ltv_moderate_points
        } else if ltv >= cfg.ltv_high_at_or_above {
            cfg.ltv_high_points
        } else {
            0
        }
    }

    fn repayment_points(&self, ratio: f64) -> i64 {
        let cfg = &self.config;
        if ratio >= cfg.repay_full_at_or_above {
            cfg.repay_full_points
        } else if ratio >= cfg.repay_partial_at_or_above {
            cfg.repay_partial_points
        } else {
            cfg.repay_shortfall_points
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
