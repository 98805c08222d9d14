//! Time source abstraction so calendar-sensitive logic is testable.

use chrono::{Local, TimeZone, Utc};

/// Millisecond-resolution time source.
pub trait Clock: Send + Sync {
    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// System wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Device-local calendar date ("YYYY-MM-DD") for an epoch-ms timestamp.
///
/// Daily limits and duplicate-code checks are keyed by the device's own
/// calendar, not UTC.
pub fn local_date_string(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .earliest()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
