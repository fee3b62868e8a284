//! Integration tests for WALLETSCORE.
//!
//! Exercise the library the way the binary does: load an export, group,
//! score, and write reports.

mod pipeline;
mod properties;
