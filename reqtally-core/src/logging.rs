use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LogMode {
    /// One JSON object per event.
    Json,
    /// Human readable lines.
    Pretty,
}

/// Pick the log format from where stderr goes: a terminal gets readable
/// lines, anything else gets JSON.
pub fn default_log_mode() -> LogMode {
    if io::stderr().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Json
    }
}

/// Initialize the logging system with environment-based filtering.
///
/// - `RUST_LOG` selects levels, defaulting to "info"
/// - everything is written to stderr; stdout is reserved for reports
/// - JSON events are flattened for easier ingestion
pub fn init_logging(mode: LogMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    match mode {
        LogMode::Json => builder.json().flatten_event(true).init(),
        LogMode::Pretty => builder.with_thread_names(true).init(),
    }
}
