use crate::pipeline::Context;
use crate::runtime::StopToken;
use std::sync::Arc;
use tracing::debug;

/// Evict request windows older than the correlation lifetime.
///
/// Returns the number of windows dropped.
pub fn sweep(ctx: &Context) -> usize {
    let cutoff = ctx.now() - ctx.config.request_lifetime();
    let evicted = ctx.requests.discard_older_than(cutoff);
    if evicted > 0 {
        debug!(evicted, cutoff, "evicted expired request windows");
        ctx.counters.request_windows_evicted.add(evicted as u64);
    }
    evicted
}

pub fn run(ctx: Arc<Context>, stop: &StopToken) {
    let period = ctx.config.cleanup_period();
    while !stop.sleep(period) {
        sweep(&ctx);
    }
}
