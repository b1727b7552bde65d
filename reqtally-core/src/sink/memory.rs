use crate::sink::{ReportSink, SinkError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every report in memory. Clones share the same buffer, so a caller
/// can hand one clone to the pipeline and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }
}

impl ReportSink for MemorySink {
    fn write_report(&mut self, report: &str) -> Result<(), SinkError> {
        self.reports.lock().push(report.to_string());
        Ok(())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}
