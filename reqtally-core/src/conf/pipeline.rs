use crate::conf::ConfigError;
use crate::conf::constraints::{
    CLEANUP_PERIOD_MS, EVENT_WINDOW_SECONDS, LINE_WINDOW_SECONDS, OUTPUT_INTERVAL_SECONDS,
    OUTPUT_TICK_MS, REQUEST_LIFETIME_SECONDS, WAIT_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Window widths, correlation lifetime and worker pacing.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Width of a line window in seconds.
    pub line_window_seconds: u64,

    /// Width of a request/response event window in seconds.
    pub event_window_seconds: u64,

    /// Width of a reported interval in seconds.
    pub output_interval_seconds: u64,

    /// How long a request waits for its response before it is evicted.
    pub request_lifetime_seconds: u64,

    /// Period of the request eviction sweep.
    pub cleanup_period_ms: u64,

    /// Period of the output gate.
    pub output_tick_ms: u64,

    /// Upper bound on how long a worker sleeps waiting for new data.
    pub wait_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            line_window_seconds: 1,
            event_window_seconds: 1,
            output_interval_seconds: 60,
            request_lifetime_seconds: 20,
            cleanup_period_ms: 1000,
            output_tick_ms: 100,
            wait_timeout_ms: 100,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        LINE_WINDOW_SECONDS.check(self.line_window_seconds)?;
        EVENT_WINDOW_SECONDS.check(self.event_window_seconds)?;
        OUTPUT_INTERVAL_SECONDS.check(self.output_interval_seconds)?;
        REQUEST_LIFETIME_SECONDS.check(self.request_lifetime_seconds)?;
        CLEANUP_PERIOD_MS.check(self.cleanup_period_ms)?;
        OUTPUT_TICK_MS.check(self.output_tick_ms)?;
        WAIT_TIMEOUT_MS.check(self.wait_timeout_ms)?;

        // a window must never straddle an output interval boundary
        for (label, width) in [
            (LINE_WINDOW_SECONDS.label, self.line_window_seconds),
            (EVENT_WINDOW_SECONDS.label, self.event_window_seconds),
        ] {
            if self.output_interval_seconds % width != 0 {
                return Err(ConfigError::Misaligned {
                    label,
                    interval: self.output_interval_seconds,
                    width,
                });
            }
        }

        Ok(())
    }

    pub fn line_window(&self) -> i64 {
        self.line_window_seconds as i64
    }

    pub fn event_window(&self) -> i64 {
        self.event_window_seconds as i64
    }

    pub fn output_interval(&self) -> i64 {
        self.output_interval_seconds as i64
    }

    pub fn request_lifetime(&self) -> i64 {
        self.request_lifetime_seconds as i64
    }

    pub fn cleanup_period(&self) -> Duration {
        Duration::from_millis(self.cleanup_period_ms)
    }

    pub fn output_tick(&self) -> Duration {
        Duration::from_millis(self.output_tick_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}
