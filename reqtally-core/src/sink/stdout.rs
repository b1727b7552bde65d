use crate::sink::{ReportSink, SinkError};
use std::io::{self, Write};

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn write_report(&mut self, report: &str) -> Result<(), SinkError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{report}")
            .and_then(|_| out.flush())
            .map_err(SinkError::Stdout)
    }

    fn name(&self) -> String {
        "stdout".to_string()
    }
}
