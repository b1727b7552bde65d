//! The five stage streaming pipeline.
//!
//! ```text
//! input -> reader -> [filling lines] -> [ready lines] -> parser
//!       -> [requests] / [responses] -> aggregator -> [stats] -> output gate -> sink
//! ```
//!
//! Stages only talk through the time-keyed stores held in [`Context`].

mod aggregate;
pub mod cleanup;
mod context;
mod counters;
mod events;
mod lines;
mod output;
mod parse;
mod run;
mod stats;

#[cfg(test)]
mod tests;

pub use aggregate::Aggregator;
pub use context::Context;
pub use counters::{Counter, PipelineCounters, RunSummary};
pub use events::{Event, EventStore, EventWindow};
pub use lines::{Line, LineReader, LineWindow, flush_line_windows};
pub use output::{OutputGate, render_report};
pub use parse::LineProcessor;
pub use run::{Pipeline, run_pipeline};
pub use stats::{StatsStore, StatsTable, StatsWindow, UNDEFINED_REQUEST};
