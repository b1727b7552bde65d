use crate::pipeline::aggregate::Aggregator;
use crate::pipeline::counters::RunSummary;
use crate::pipeline::lines::LineReader;
use crate::pipeline::output::OutputGate;
use crate::pipeline::parse::LineProcessor;
use crate::pipeline::{Context, cleanup};
use crate::runtime::{InterruptFlag, StopToken, Worker};
use crate::sink::ReportSink;
use anyhow::Context as _;
use std::io::BufRead;
use std::sync::Arc;
use tracing::info;

/// The running set of workers.
///
/// Workers are stopped in pipeline order so each one drains what its
/// producer left behind: reader, cleanup, parser, aggregator, output.
#[derive(Debug)]
pub struct Pipeline {
    ctx: Arc<Context>,
    lines: LineReader,
    reader: Worker,
    cleanup: Worker,
    parser: Worker,
    aggregator: Worker,
    output: Worker,
}

impl Pipeline {
    pub fn start<R>(ctx: Arc<Context>, input: R, sink: Box<dyn ReportSink>) -> anyhow::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        info!(
            line_window = ctx.config.line_window_seconds,
            event_window = ctx.config.event_window_seconds,
            output_interval = ctx.config.output_interval_seconds,
            request_lifetime = ctx.config.request_lifetime_seconds,
            sink = %sink.name(),
            "starting pipeline"
        );

        let lines = LineReader::new(Arc::clone(&ctx));
        let reader = {
            let lines = lines.clone();
            Worker::spawn("reader", move |stop| {
                lines.run(input, &stop);
                // the reader's token doubles as "input finished"
                stop.request_stop();
            })
            .context("failed to spawn reader")?
        };

        let cleanup = {
            let ctx = Arc::clone(&ctx);
            Worker::spawn("cleanup", move |stop| cleanup::run(ctx, &stop))
                .context("failed to spawn cleanup")?
        };

        let parser = {
            let ctx = Arc::clone(&ctx);
            Worker::spawn("parser", move |stop| LineProcessor::new(ctx).run(&stop))
                .context("failed to spawn parser")?
        };

        let aggregator = {
            let ctx = Arc::clone(&ctx);
            Worker::spawn("aggregator", move |stop| Aggregator::new(ctx).run(&stop))
                .context("failed to spawn aggregator")?
        };

        let output = {
            let ctx = Arc::clone(&ctx);
            Worker::spawn("output", move |stop| OutputGate::new(ctx, sink).run(&stop))
                .context("failed to spawn output")?
        };

        Ok(Self {
            ctx,
            lines,
            reader,
            cleanup,
            parser,
            aggregator,
            output,
        })
    }

    /// Stop signal of the reader; requesting it ends input early.
    pub fn reader_token(&self) -> StopToken {
        self.reader.token().clone()
    }

    /// Block until input is finished, then shut the workers down in order.
    ///
    /// After an interrupt the reader may still be blocked in a read, so it is
    /// closed from here and the thread is left behind. A line it is windowing
    /// at that moment either lands before the final flush or is dropped.
    pub fn wait(self, interrupt: &InterruptFlag) -> RunSummary {
        self.reader.token().wait();

        if interrupt.is_raised() {
            self.lines.close();
            self.reader.detach();
        } else {
            self.reader.join();
        }

        self.cleanup.stop();
        self.parser.stop();
        self.aggregator.stop();
        self.output.stop();

        let summary = self.ctx.counters.summary();
        info!(
            lines = summary.lines_read,
            requests = summary.requests_parsed,
            responses = summary.responses_parsed,
            matched = summary.responses_matched,
            undefined = summary.responses_undefined,
            evicted_windows = summary.request_windows_evicted,
            reports = summary.reports_emitted,
            sink_failures = summary.sink_failures,
            "pipeline finished"
        );
        summary
    }
}

/// Run the whole pipeline over `input` until it is exhausted.
pub fn run_pipeline<R>(
    ctx: Arc<Context>,
    input: R,
    sink: Box<dyn ReportSink>,
) -> anyhow::Result<RunSummary>
where
    R: BufRead + Send + 'static,
{
    let pipeline = Pipeline::start(ctx, input, sink)?;
    Ok(pipeline.wait(&InterruptFlag::default()))
}
