use crate::sink::{ReportSink, SinkError};
use std::fs;
use std::path::PathBuf;

/// Writes each report to a single named file.
///
/// Every report replaces the previous file contents, so the file always holds
/// the most recently emitted interval. The table is written as rendered, with
/// no trailing newline.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn write_report(&mut self, report: &str) -> Result<(), SinkError> {
        fs::write(&self.path, report).map_err(|source| SinkError::WriteFile {
            path: self.path.clone(),
            source,
        })
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}
