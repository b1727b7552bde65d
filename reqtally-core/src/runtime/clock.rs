use chrono::{Local, TimeZone};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock seconds for windowing.
///
/// Every stage quantizes against the same clock so that line windows, event
/// windows and output intervals agree on what "now" is.
pub trait Clock: Debug + Send + Sync {
    /// Current Unix time in whole seconds.
    fn now_secs(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to. Used to pin window boundaries.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_secs: i64) -> Self {
        Self {
            now: AtomicI64::new(start_secs),
        }
    }

    pub fn set(&self, secs: i64) {
        self.now.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Round `ts` down to the start of its `width`-second bucket.
pub fn quantize(ts: i64, width: i64) -> i64 {
    debug_assert!(width > 0);
    ts - ts.rem_euclid(width)
}

/// Local wall time rendering used in log fields, e.g. `2024-03-01 12:00:00 +01:00`.
pub fn display_time(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(t) => t.format("%F %T %Z").to_string(),
        None => ts.to_string(),
    }
}
