//! Behavioural properties of the scoring engine across many wallets.

use walletscore::clock::FixedClock;
use walletscore::ingest::group_by_wallet;
use walletscore::pipeline::score_wallets;
use walletscore::scoring::ScoreEngine;
use walletscore::types::{ActionKind, Transaction};

const DAY: i64 = 86_400;
const NOW: i64 = 1_750_000_000;

fn clock() -> FixedClock {
    FixedClock::from_unix(NOW)
}

fn mixed_history() -> Vec<Transaction> {
    let actions = [
        ActionKind::Deposit,
        ActionKind::Borrow,
        ActionKind::Repay,
        ActionKind::RedeemUnderlying,
        ActionKind::Deposit,
        ActionKind::LiquidationCall,
        ActionKind::Other,
    ];
    let mut txs = Vec::new();
    for w in 0..25i64 {
        let wallet = format!("0xwallet{w:02}");
        for i in 0..(w % 9 + 1) {
            let action = actions[((w + i) % actions.len() as i64) as usize];
            let amount = format!("{}", (w + 1) * 700 + i * 13);
            let ts = NOW - (w * 20 + 1) * DAY + i * (w * 7 + 5);
            txs.push(Transaction::new(&wallet, action, &amount, "1.25", ts));
        }
    }
    txs
}

#[test]
fn test_shuffled_input_gives_same_per_wallet_scores() {
    let engine = ScoreEngine::default();
    let txs = mixed_history();

    let mut baseline: Vec<_> = score_wallets(&engine, &group_by_wallet(txs.clone()), &clock(), false);
    baseline.sort_by(|a, b| a.wallet.cmp(&b.wallet));

    // Deterministic reshuffles: reversed, and a stride-7 permutation.
    let mut reversed = txs.clone();
    reversed.reverse();
    let n = txs.len();
    let strided: Vec<Transaction> = (0..n).map(|i| txs[(i * 7) % n].clone()).collect();
    assert!(n % 7 != 0, "stride must be coprime with the length");

    for shuffled in [reversed, strided] {
        let mut scores = score_wallets(&engine, &group_by_wallet(shuffled), &clock(), true);
        scores.sort_by(|a, b| a.wallet.cmp(&b.wallet));
        assert_eq!(scores, baseline);
    }
}

#[test]
fn test_other_wallets_do_not_influence_score() {
    let engine = ScoreEngine::default();
    let alone = vec![Transaction::new("0xsolo", ActionKind::Deposit, "1000", "2", NOW - 10 * DAY)];

    let mut crowded = mixed_history();
    crowded.insert(3, alone[0].clone());

    let groups = group_by_wallet(crowded);
    let scores = score_wallets(&engine, &groups, &clock(), true);
    let solo = scores.iter().find(|r| r.wallet == "0xsolo").unwrap();
    assert_eq!(solo.score, 700);
    assert_eq!(engine.score("0xsolo", &alone, &clock()).score, 700);
}

#[test]
fn test_scores_always_in_range() {
    let engine = ScoreEngine::default();
    let scores = score_wallets(&engine, &group_by_wallet(mixed_history()), &clock(), true);
    assert_eq!(scores.len(), 25);
    assert!(scores.iter().all(|r| r.score <= 1000));
}

#[test]
fn test_heavy_active_wallet_clamps_to_max() {
    let engine = ScoreEngine::default();
    let mut txs = vec![
        Transaction::new("0xwhale", ActionKind::Deposit, "500000", "1", NOW - 800 * DAY),
        Transaction::new("0xwhale", ActionKind::Borrow, "10000", "1", NOW - 700 * DAY),
        Transaction::new("0xwhale", ActionKind::Repay, "10000", "1", NOW - 600 * DAY),
    ];
    for i in 0..120 {
        txs.push(Transaction::new("0xwhale", ActionKind::Other, "0", "0", NOW - 500 * DAY + i * DAY));
    }
    let a = engine.assess("0xwhale", &txs, &clock());
    // 500 + 150 + 100 + 200 + 200 + 100
    assert_eq!(a.breakdown.raw, 1250);
    assert_eq!(a.breakdown.score, 1000);
}

#[test]
fn test_redeem_volume_does_not_change_score() {
    let engine = ScoreEngine::default();
    let base = vec![Transaction::new("0xr", ActionKind::Deposit, "1000", "2", NOW - 10 * DAY)];
    let mut with_redeem = base.clone();
    with_redeem.push(Transaction::new("0xr", ActionKind::RedeemUnderlying, "1000000", "5", NOW - 9 * DAY));

    let a = engine.assess("0xr", &with_redeem, &clock());
    assert_eq!(a.metrics.total_redeems_usd, 5_000_000.0);
    assert_eq!(a.breakdown.score, engine.score("0xr", &base, &clock()).score);
}
