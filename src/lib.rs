//! WALLETSCORE — Heuristic DeFi Wallet Credit Scoring
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod clock;
pub mod ingest;
pub mod scoring;
pub mod pipeline;
pub mod report;
