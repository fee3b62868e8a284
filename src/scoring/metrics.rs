//! Per-wallet aggregation.
//!
//! Reduces a wallet's transactions into the handful of numbers the scoring
//! rules look at. Order of the input doesn't matter.

use serde::Serialize;

use super::coerce::usd_value;
use crate::types::{ActionKind, Transaction};

const SECONDS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// Aggregates derived from one wallet's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletMetrics {
    pub total_deposits_usd: f64,
    pub total_borrows_usd: f64,
    pub total_repays_usd: f64,
    /// Tracked for reporting only; no rule reads it.
    pub total_redeems_usd: f64,
    pub liquidation_count: u32,
    pub transaction_count: usize,
    pub earliest_timestamp: Option<i64>,
    pub wallet_age_days: f64,
    /// Mean gap between consecutive transactions, once there are at least two.
    pub mean_interval_secs: Option<f64>,
}

impl WalletMetrics {
    /// Aggregate `transactions` as seen at `now_unix` (fractional Unix seconds).
    pub fn from_transactions(transactions: &[Transaction], now_unix: f64) -> Self {
        let mut metrics = WalletMetrics {
            transaction_count: transactions.len(),
            ..Default::default()
        };

        for tx in transactions {
            let amount_usd = usd_value(
                tx.action_data.amount.as_ref(),
                tx.action_data.asset_price_usd.as_ref(),
            );

            match tx.action {
                ActionKind::Deposit => metrics.total_deposits_usd += amount_usd,
                ActionKind::Borrow => metrics.total_borrows_usd += amount_usd,
                ActionKind::Repay => metrics.total_repays_usd += amount_usd,
                ActionKind::RedeemUnderlying => metrics.total_redeems_usd += amount_usd,
                ActionKind::LiquidationCall => metrics.liquidation_count += 1,
                ActionKind::Other => {}
            }
        }

        metrics.earliest_timestamp = transactions.iter().map(|tx| tx.timestamp).min();
        metrics.wallet_age_days = match metrics.earliest_timestamp {
            Some(earliest) => (now_unix - earliest as f64) / SECONDS_PER_DAY,
            None => 0.0,
        };
        metrics.mean_interval_secs = mean_interval(transactions);

        metrics
    }

    /// Borrowed USD over deposited USD; 0 when nothing was deposited.
    pub fn loan_to_value(&self) -> f64 {
        if self.total_deposits_usd > 0.0 {
            self.total_borrows_usd / self.total_deposits_usd
        } else {
            0.0
        }
    }

    /// Repaid USD over borrowed USD; 0 when nothing was borrowed.
    pub fn repayment_ratio(&self) -> f64 {
        if self.total_borrows_usd > 0.0 {
            self.total_repays_usd / self.total_borrows_usd
        } else {
            0.0
        }
    }
}

/// Arithmetic mean of consecutive differences of the sorted timestamps.
fn mean_interval(transactions: &[Transaction]) -> Option<f64> {
    if transactions.len() < 2 {
        return None;
    }

    let mut timestamps: Vec<i64> = transactions.iter().map(|tx| tx.timestamp).collect();
    timestamps.sort_unstable();

    let diffs: Vec<f64> = timestamps
        .windows(2)
        .map(|w| w[1] as f64 - w[0] as f64)
        .collect();

    Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
}
