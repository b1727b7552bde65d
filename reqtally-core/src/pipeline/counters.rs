use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn bump(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Running totals shared by all workers.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    pub lines_read: Counter,
    pub line_windows_parsed: Counter,
    pub requests_parsed: Counter,
    pub responses_parsed: Counter,
    pub responses_matched: Counter,
    pub responses_undefined: Counter,
    pub request_windows_evicted: Counter,
    pub reports_emitted: Counter,
    pub sink_failures: Counter,
}

impl PipelineCounters {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            lines_read: self.lines_read.get(),
            line_windows_parsed: self.line_windows_parsed.get(),
            requests_parsed: self.requests_parsed.get(),
            responses_parsed: self.responses_parsed.get(),
            responses_matched: self.responses_matched.get(),
            responses_undefined: self.responses_undefined.get(),
            request_windows_evicted: self.request_windows_evicted.get(),
            reports_emitted: self.reports_emitted.get(),
            sink_failures: self.sink_failures.get(),
        }
    }
}

/// Point-in-time copy of [`PipelineCounters`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub lines_read: u64,
    pub line_windows_parsed: u64,
    pub requests_parsed: u64,
    pub responses_parsed: u64,
    pub responses_matched: u64,
    pub responses_undefined: u64,
    pub request_windows_evicted: u64,
    pub reports_emitted: u64,
    pub sink_failures: u64,
}
