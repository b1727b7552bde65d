//! Report destinations.
//!
//! The pipeline only ever asks a sink to "write these bytes"; the sink decides
//! where they go. One sink is selected for the whole run.

mod error;
mod file;
mod memory;
mod stdout;


pub use error::SinkError;
pub use file::FileSink;
pub use memory::MemorySink;
pub use stdout::StdoutSink;

use std::path::PathBuf;

pub trait ReportSink: Send {
    /// Deliver one rendered report.
    fn write_report(&mut self, report: &str) -> Result<(), SinkError>;

    /// Human-readable destination name for logs.
    fn name(&self) -> String;
}

/// Build the sink selected on the command line: a file when a path is given,
/// standard output otherwise.
pub fn select_sink(output: Option<PathBuf>) -> Box<dyn ReportSink> {
    match output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    }
}
