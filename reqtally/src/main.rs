use anyhow::Context as _;
use clap::Parser;
use owo_colors::OwoColorize;
use reqtally_core::conf::load_config;
use reqtally_core::logging::{default_log_mode, init_logging};
use reqtally_core::pipeline::{Context, Pipeline};
use reqtally_core::runtime::{InterruptFlag, SystemClock, install_interrupt_handler};
use reqtally_core::sink::select_sink;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "reqtally",
    version,
    about = "Count request paths by response code, per time interval, from a stream on stdin"
)]
struct Cli {
    /// Write each report to this file instead of stdout (overwritten every interval)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to an HCL file with pipeline settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(default_log_mode());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let sink = select_sink(cli.output);

    let ctx = Context::new(config, Arc::new(SystemClock));
    let input = BufReader::new(io::stdin());
    let pipeline = Pipeline::start(ctx, input, sink)?;

    let interrupt = InterruptFlag::default();
    install_interrupt_handler(pipeline.reader_token(), interrupt.clone())
        .context("failed to install interrupt handler")?;

    pipeline.wait(&interrupt);
    Ok(())
}
