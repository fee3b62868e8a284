//! Shared types for WALLETSCORE.
//!
//! The input side (`Transaction` and friends) mirrors the JSON export of
//! lending-protocol events; the output side (`ScoreRecord`) is what the
//! report writers consume.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Kind of lending action recorded for a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Deposit,
    Borrow,
    Repay,
    RedeemUnderlying,
    LiquidationCall,
    /// Any action string we don't score on.
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Deposit => write!(f, "deposit"),
            ActionKind::Borrow => write!(f, "borrow"),
            ActionKind::Repay => write!(f, "repay"),
            ActionKind::RedeemUnderlying => write!(f, "redeemunderlying"),
            ActionKind::LiquidationCall => write!(f, "liquidationcall"),
            ActionKind::Other => write!(f, "other"),
        }
    }
}

/// Payload attached to an action. Both fields are kept as raw JSON values
/// because exports encode them as strings, numbers or leave them out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionData {
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(rename = "assetPriceUSD", default)]
    pub asset_price_usd: Option<serde_json::Value>,
}

/// One recorded DeFi action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "userWallet")]
    pub user_wallet: String,
    #[serde(default, deserialize_with = "lenient_action")]
    pub action: ActionKind,
    #[serde(rename = "actionData", default)]
    pub action_data: ActionData,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Any `action` that isn't a string (null, number, object) reads as `Other`
/// rather than failing the whole file.
fn lenient_action<'de, D>(deserializer: D) -> Result<ActionKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ serde_json::Value::String(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => ActionKind::Other,
    })
}

impl Transaction {
    /// Build a transaction with string-encoded amount and price, the way
    /// exports usually carry them.
    pub fn new(wallet: &str, action: ActionKind, amount: &str, price_usd: &str, timestamp: i64) -> Self {
        Self {
            user_wallet: wallet.to_string(),
            action,
            action_data: ActionData {
                amount: Some(serde_json::Value::String(amount.to_string())),
                asset_price_usd: Some(serde_json::Value::String(price_usd.to_string())),
            },
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Final score for one wallet. Serialises as a `wallet,score` CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub wallet: String,
    /// Always within [0, 1000].
    pub score: u32,
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.wallet, self.score)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal errors surfaced to the caller. Numeric coercion failures are not
/// here: they are absorbed by `scoring::coerce::parse_or_zero`.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Input error ({path}): {message}")]
    Input { path: String, message: String },

    #[error("Output error ({path}): {message}")]
    Output { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
