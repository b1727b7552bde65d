mod input;
pub mod tracing;

pub use self::input::{ChannelInput, ScriptedInput};
pub use self::tracing::{CapturedEvent, init_test_tracing};

use reqtally_core::conf::PipelineConfig;
use reqtally_core::pipeline::Context;
use reqtally_core::runtime::ManualClock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Settings that keep worker wake-ups short so tests finish quickly.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        output_tick_ms: 5,
        wait_timeout_ms: 5,
        cleanup_period_ms: 10,
        ..PipelineConfig::default()
    }
}

pub fn manual_context(config: PipelineConfig, now: i64) -> (Arc<Context>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    (Context::new(config, clock.clone()), clock)
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
