//! Input loading and per-wallet grouping.
//!
//! Reads the JSON transaction export and partitions it by wallet before
//! anything gets scored. Wallets keep the order in which they first show
//! up in the file; each wallet's transactions keep file order.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{ScoringError, Transaction};

/// Load a JSON array of transactions from `path`.
///
/// A missing file, unreadable file, or anything other than an array of
/// well-formed transaction records is an input error. Per-field numeric
/// problems are not checked here; the engine coerces them.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, ScoringError> {
    let shown = path.display().to_string();

    let json = std::fs::read_to_string(path).map_err(|e| ScoringError::Input {
        path: shown.clone(),
        message: format!("failed to read file: {e}"),
    })?;

    let transactions = parse_transactions(&json).map_err(|e| ScoringError::Input {
        path: shown.clone(),
        message: format!("failed to parse transactions: {e}"),
    })?;

    info!(path = %shown, count = transactions.len(), "Transactions loaded");
    Ok(transactions)
}

/// Parse an in-memory JSON document into transactions.
pub fn parse_transactions(json: &str) -> Result<Vec<Transaction>, serde_json::Error> {
    serde_json::from_str(json)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Transactions partitioned by wallet id, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct WalletGroups {
    groups: Vec<(String, Vec<Transaction>)>,
    index: HashMap<String, usize>,
}

impl WalletGroups {
    /// Number of distinct wallets.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Transactions for one wallet, if it appeared in the input.
    pub fn get(&self, wallet: &str) -> Option<&[Transaction]> {
        self.index.get(wallet).map(|&i| self.groups[i].1.as_slice())
    }

    /// Iterate `(wallet, transactions)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Transaction])> {
        self.groups.iter().map(|(w, txs)| (w.as_str(), txs.as_slice()))
    }

    /// The groups as a slice, for parallel iteration.
    pub fn as_slice(&self) -> &[(String, Vec<Transaction>)] {
        &self.groups
    }

    fn push(&mut self, tx: Transaction) {
        match self.index.get(&tx.user_wallet) {
            Some(&i) => self.groups[i].1.push(tx),
            None => {
                self.index.insert(tx.user_wallet.clone(), self.groups.len());
                self.groups.push((tx.user_wallet.clone(), vec![tx]));
            }
        }
    }
}

impl FromIterator<Transaction> for WalletGroups {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut groups = WalletGroups::default();
        for tx in iter {
            groups.push(tx);
        }
        groups
    }
}

/// Build the wallet → transactions mapping in one pass.
pub fn group_by_wallet(transactions: Vec<Transaction>) -> WalletGroups {
    let total = transactions.len();
    let groups: WalletGroups = transactions.into_iter().collect();
    debug!(transactions = total, wallets = groups.len(), "Grouped transactions by wallet");
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
