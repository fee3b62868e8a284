//! Time source used for wallet-age computation.
//!
//! The engine never reads the wall clock directly; it asks a `Clock`.
//! Production uses `SystemClock`, tests pin time with `FixedClock`.

use chrono::{DateTime, TimeZone, Utc};

/// Anything that can tell the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as fractional Unix seconds.
    fn now_unix(&self) -> f64 {
        self.now().timestamp_millis() as f64 / 1000.0
    }
}

/// Reads `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Pin the clock to whole Unix seconds. Out-of-range values fall back
    /// to the epoch.
    pub fn from_unix(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
