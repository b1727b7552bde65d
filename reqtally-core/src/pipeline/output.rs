//! Watermark-gated emission of interval reports.
//!
//! Intervals are emitted strictly oldest first. The oldest pending interval
//! `[start, end)` goes out once `end` is in the past and no upstream store
//! still holds data stamped before `end`. Anything blocking the oldest
//! interval blocks every newer one too.

use crate::pipeline::Context;
use crate::pipeline::stats::StatsTable;
use crate::runtime::{StopToken, display_time, quantize};
use crate::sink::ReportSink;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct OutputGate {
    ctx: Arc<Context>,
    sink: Box<dyn ReportSink>,
    had_output: bool,
}

impl std::fmt::Debug for OutputGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputGate")
            .field("sink", &self.sink.name())
            .field("had_output", &self.had_output)
            .finish()
    }
}

impl OutputGate {
    pub fn new(ctx: Arc<Context>, sink: Box<dyn ReportSink>) -> Self {
        Self {
            ctx,
            sink,
            had_output: false,
        }
    }

    pub fn had_output(&self) -> bool {
        self.had_output
    }

    /// Emit every interval that is due, oldest first.
    ///
    /// With `force` an interval that has not ended yet is emitted anyway; the
    /// upstream check still applies. Returns the number of reports emitted.
    pub fn emit_ready(&mut self, force: bool) -> usize {
        let width = self.ctx.config.output_interval();
        let mut emitted = 0;

        while let Some((start, window)) = self.ctx.stats.oldest() {
            let end = start + width;

            if !force && end > quantize(self.ctx.now(), width) {
                break;
            }
            if let Some(stage) = self.pending_upstream(end) {
                debug!(interval = start, stage, "waiting for {stage} before emitting");
                break;
            }

            let (report, rows) = {
                let table = window.lock();
                (render_report(&table), table.len())
            };
            info!(
                interval = start,
                rows,
                from = %display_time(start),
                to = %display_time(end),
                sink = %self.sink.name(),
                "emitting interval report"
            );
            if let Err(e) = self.sink.write_report(&report) {
                warn!(interval = start, error = %e, "failed to write report");
                self.ctx.counters.sink_failures.bump();
            }

            self.ctx.stats.remove(&window);
            self.ctx.counters.reports_emitted.bump();
            self.had_output = true;
            emitted += 1;
        }

        emitted
    }

    /// Name of the first upstream store holding data stamped before `end`.
    pub fn pending_upstream(&self, end: i64) -> Option<&'static str> {
        let before_end = |key: Option<i64>| key.is_some_and(|key| key < end);

        // upstream first: data moves filling -> ready -> responses
        if before_end(self.ctx.filling_lines.oldest_key()) {
            Some("filling line windows")
        } else if before_end(self.ctx.ready_lines.oldest_key()) {
            Some("ready line windows")
        } else if before_end(self.ctx.responses.oldest_key()) {
            Some("response windows")
        } else {
            None
        }
    }

    /// Tick until stopped, then run one last pass.
    ///
    /// The last pass is forced when nothing has been emitted during the run.
    pub fn run(mut self, stop: &StopToken) {
        let tick = self.ctx.config.output_tick();
        loop {
            let stopping = stop.sleep(tick);
            let force = stopping && !self.had_output;
            self.emit_ready(force);
            if stopping {
                break;
            }
        }

        let left = self.ctx.stats.len();
        if left > 0 {
            debug!(intervals = left, "dropping unfinished intervals");
        }
    }
}

/// Render one interval as `request;<code>;...` followed by a row per path.
///
/// Codes are the sorted union over all paths; absent combinations are `0`.
pub fn render_report(table: &StatsTable) -> String {
    let codes: BTreeSet<&str> = table
        .values()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut out = String::from("request");
    for code in &codes {
        let _ = write!(out, ";{code}");
    }

    for (path, row) in table {
        let _ = write!(out, "\n{path}");
        for code in &codes {
            let _ = write!(out, ";{}", row.get(*code).copied().unwrap_or(0));
        }
    }

    out
}
