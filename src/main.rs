//! CLI entry point for channel-puller.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use channel_puller::batch::BatchProcessor;
use channel_puller::fetch::{HttpTransport, RetryingFetcher};
use channel_puller::input::resolve_inputs;

mod cli;
mod progress;

use cli::Args;
use progress::BarProgress;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    if args.inputs.is_empty() {
        let bin = Args::command().get_name().to_string();
        println!("No inputs given.");
        println!("Usage: {bin} [OPTIONS] <URL|FILE>...");
        println!("Example: {bin} https://www.youtube.com/watch?v=dQw4w9WgXcQ links.txt");
        return Ok(());
    }

    info!(inputs = ?args.inputs, "channel-puller starting");

    let items = resolve_inputs(args.inputs.as_slice()).context("failed to read inputs")?;
    let invalid = items.iter().filter(|item| !item.is_valid()).count();
    info!(items = items.len(), invalid, "inputs resolved");

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let transport = Arc::new(HttpTransport::new().context("failed to build HTTP client")?);
    let fetcher = RetryingFetcher::new(transport, args.fetch_config()).with_cancellation(cancel);
    let processor = BatchProcessor::new(fetcher);

    let destination = args.output_path(chrono::Local::now().date_naive());
    let show_bar = !args.quiet && io::stderr().is_terminal();
    let progress = BarProgress::new(show_bar, items.len());

    let result = processor
        .process_to_file(&items, &destination, &progress)
        .await;
    progress.finish();
    let report =
        result.with_context(|| format!("failed to write {}", destination.display()))?;

    info!(
        succeeded = report.stats.succeeded(),
        failed = report.stats.failed(),
        invalid = report.stats.invalid(),
        retried = report.stats.retried(),
        total = report.stats.total(),
        "Lookup complete"
    );
    if !args.quiet {
        println!(
            "Wrote {} rows ({} with errors) to {}",
            report.stats.total(),
            report.stats.errors(),
            report.path.display()
        );
    }

    Ok(())
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            cancel.cancel();
        }
    });
}
