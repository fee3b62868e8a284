//! End-to-end batch runs against the bundled fixture.

use std::path::{Path, PathBuf};

use walletscore::clock::FixedClock;
use walletscore::config::OutputConfig;
use walletscore::pipeline;
use walletscore::scoring::{ScoreEngine, ScoringConfig};
use walletscore::types::{ScoreRecord, ScoringError};

const NOW: i64 = 1_750_000_000;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/transactions.json")
}

fn temp_dir() -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("walletscore_it_{}", uuid::Uuid::new_v4()));
    p
}

fn record(wallet: &str, score: u32) -> ScoreRecord {
    ScoreRecord { wallet: wallet.to_string(), score }
}

#[test]
fn test_run_scores_fixture() {
    let out = temp_dir();
    let engine = ScoreEngine::new(ScoringConfig::default()).unwrap();
    let summary = pipeline::run(
        &fixture(),
        &out,
        &engine,
        &OutputConfig::default(),
        &FixedClock::from_unix(NOW),
        true,
    )
    .unwrap();

    assert_eq!(summary.transactions, 8);
    assert_eq!(
        summary.records,
        vec![
            // large deposit, old, low LTV, fully repaid; clamped from 1150
            record("0xaaa0000000000000000000000000000000000001", 1000),
            // $2000 deposit, ~579 days old
            record("0xbbb0000000000000000000000000000000000002", 800),
            // two liquidations, 10s cadence, unparseable borrow
            record("0xccc0000000000000000000000000000000000003", 150),
        ]
    );

    let csv = std::fs::read_to_string(out.join("wallet_scores.csv")).unwrap();
    assert_eq!(
        csv,
        "wallet,score\n\
         0xaaa0000000000000000000000000000000000001,1000\n\
         0xbbb0000000000000000000000000000000000002,800\n\
         0xccc0000000000000000000000000000000000003,150\n"
    );

    let counts: Vec<usize> = summary.histogram.buckets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![0, 1, 0, 0, 0, 0, 0, 0, 1, 1]);

    let svg = std::fs::read_to_string(out.join("score_distribution.svg")).unwrap();
    assert!(svg.contains("Wallet Score Distribution"));

    std::fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_run_honours_output_names() {
    let out = temp_dir();
    let output = OutputConfig {
        scores_file: "scores.csv".into(),
        chart_file: "dist.svg".into(),
    };
    let summary = pipeline::run(
        &fixture(),
        &out,
        &ScoreEngine::default(),
        &output,
        &FixedClock::from_unix(NOW),
        false,
    )
    .unwrap();

    assert_eq!(summary.csv_path, out.join("scores.csv"));
    assert!(out.join("scores.csv").exists());
    assert!(out.join("dist.svg").exists());

    std::fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_missing_input_writes_nothing() {
    let out = temp_dir();
    let err = pipeline::run(
        Path::new("/tmp/walletscore_no_such_input_98765.json"),
        &out,
        &ScoreEngine::default(),
        &OutputConfig::default(),
        &FixedClock::from_unix(NOW),
        true,
    )
    .unwrap_err();

    assert!(matches!(err, ScoringError::Input { .. }));
    assert!(!out.exists());
}

#[test]
fn test_malformed_input_writes_nothing() {
    let out = temp_dir();
    std::fs::create_dir_all(&out).unwrap();
    let input = out.join("bad.json");
    std::fs::write(&input, r#"{"not": "an array"}"#).unwrap();

    let err = pipeline::run(
        &input,
        &out,
        &ScoreEngine::default(),
        &OutputConfig::default(),
        &FixedClock::from_unix(NOW),
        true,
    )
    .unwrap_err();

    assert!(matches!(err, ScoringError::Input { .. }));
    assert!(!out.join("wallet_scores.csv").exists());
    assert!(!out.join("score_distribution.svg").exists());

    std::fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_unwritable_output_is_output_error() {
    let out = temp_dir();
    std::fs::create_dir_all(&out).unwrap();
    // A regular file where the output directory should be.
    let blocker = out.join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let err = pipeline::run(
        &fixture(),
        &blocker,
        &ScoreEngine::default(),
        &OutputConfig::default(),
        &FixedClock::from_unix(NOW),
        true,
    )
    .unwrap_err();

    assert!(matches!(err, ScoringError::Output { .. }));
    std::fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_empty_export() {
    let out = temp_dir();
    std::fs::create_dir_all(&out).unwrap();
    let input = out.join("empty.json");
    std::fs::write(&input, "[]").unwrap();

    let summary = pipeline::run(
        &input,
        &out,
        &ScoreEngine::default(),
        &OutputConfig::default(),
        &FixedClock::from_unix(NOW),
        true,
    )
    .unwrap();

    assert_eq!(summary.wallets(), 0);
    assert_eq!(summary.histogram.total(), 0);
    assert_eq!(
        std::fs::read_to_string(out.join("wallet_scores.csv")).unwrap(),
        "wallet,score\n"
    );

    std::fs::remove_dir_all(&out).unwrap();
}
