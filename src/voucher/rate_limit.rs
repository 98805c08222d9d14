//! Creation rate limiting: a cooldown between generations plus a daily
//! cap, both backed by the injected key-value store.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{local_date_string, Clock};
use crate::storage::KvStore;

/// Storage key for the last allowed generation, epoch ms.
pub const LAST_GENERATION_KEY: &str = "last_generation_time";
/// Storage key for the daily counter record.
pub const DAILY_COUNT_KEY: &str = "daily_generation";

/// Why an acquisition was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitDenied {
    #[error("Please wait {remaining_ms}ms before creating another voucher")]
    Cooldown { remaining_ms: i64 },

    #[error("Daily limit of {cap} vouchers reached")]
    DailyCapReached { cap: u32 },
}

/// Persisted daily counter, keyed by device-local calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyCount {
    count: u32,
    date: String,
}

/// Device-wide limiter over persisted state.
///
/// The cooldown check, the counter bump, and the last-generation
/// timestamp update run under one lock: a denial has no side effects,
/// an allowance consumes the slot immediately. Interleaving from other
/// processes sharing the same storage is not guarded.
pub struct RateLimiter {
    storage: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    min_interval_ms: i64,
    daily_cap: u32,
    guard: Mutex<()>,
}

impl RateLimiter {
    pub fn new(
        storage: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        min_interval_ms: i64,
        daily_cap: u32,
    ) -> Self {
        Self {
            storage,
            clock,
            min_interval_ms,
            daily_cap,
            guard: Mutex::new(()),
        }
    }

    /// Try to consume a creation slot.
    ///
    /// The cooldown is checked before the daily cap, so a caller hammering
    /// the button sees the cooldown reason even on a capped day.
    pub fn try_acquire(&self) -> Result<(), RateLimitDenied> {
        let _guard = self.guard.lock().expect("rate limiter lock poisoned");
        let now = self.clock.now_ms();

        if let Some(last) = self.read_last_generation() {
            let elapsed = now - last;
            if elapsed < self.min_interval_ms {
                return Err(RateLimitDenied::Cooldown {
                    remaining_ms: self.min_interval_ms - elapsed,
                });
            }
        }

        let today = local_date_string(now);
        let next = match self.read_daily_count() {
            Some(daily) if daily.date == today => {
                if daily.count >= self.daily_cap {
                    return Err(RateLimitDenied::DailyCapReached {
                        cap: self.daily_cap,
                    });
                }
                DailyCount {
                    count: daily.count + 1,
                    date: today,
                }
            }
            // A stale date or no record at all starts today at 1.
            _ => DailyCount {
                count: 1,
                date: today,
            },
        };

        self.write_state(now, &next);
        Ok(())
    }

    fn read_last_generation(&self) -> Option<i64> {
        self.storage.get(LAST_GENERATION_KEY)?.trim().parse().ok()
    }

    fn read_daily_count(&self) -> Option<DailyCount> {
        let raw = self.storage.get(DAILY_COUNT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(daily) => Some(daily),
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt daily counter, resetting");
                None
            }
        }
    }

    /// Best-effort persistence: a write failure is logged and the limiter
    /// degrades to leniency rather than blocking creation.
    fn write_state(&self, now: i64, daily: &DailyCount) {
        if let Err(e) = self.storage.set(LAST_GENERATION_KEY, &now.to_string()) {
            tracing::warn!(error = %e, "Failed to persist last generation time");
        }
        match serde_json::to_string(daily) {
            Ok(json) => {
                if let Err(e) = self.storage.set(DAILY_COUNT_KEY, &json) {
                    tracing::warn!(error = %e, "Failed to persist daily counter");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize daily counter"),
        }
    }
}
