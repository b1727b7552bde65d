mod lines_tests;

use crate::conf::PipelineConfig;
use crate::pipeline::{Context, LineWindow};
use crate::runtime::ManualClock;
use std::sync::Arc;

pub(super) fn context_at(now: i64) -> (Arc<Context>, Arc<ManualClock>) {
    context_with(PipelineConfig::default(), now)
}

pub(super) fn context_with(config: PipelineConfig, now: i64) -> (Arc<Context>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    (Context::new(config, clock.clone()), clock)
}

/// Register a ready line window holding `lines`.
pub(super) fn ready_window(ctx: &Context, key: i64, lines: &[&str]) {
    let window = LineWindow::new(key);
    for text in lines {
        window.push(crate::pipeline::Line {
            text: text.to_string(),
            received_at: key,
        });
    }
    ctx.ready_lines.add(key, Arc::new(window));
}
