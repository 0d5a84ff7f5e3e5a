//! CLI entry point for the parfetch tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use parfetch::{DownloadPool, HttpClient};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    if args.urls.is_empty() {
        println!("Usage: parfetch -c 3 <url1> <url2> ...");
        return Ok(());
    }

    info!(urls = args.urls.len(), concurrency = args.concurrency, "parfetch starting");

    let client = HttpClient::new();
    let pool = DownloadPool::new(usize::from(args.concurrency))?;

    // Destination files land in the current working directory.
    let output_dir = PathBuf::from(".");
    let progress = MultiProgress::new();

    println!("\n--- Summary ---");
    let results = pool
        .run(&client, &output_dir, args.urls, Some(progress), |result| {
            // Stream summary lines in completion order. Bars draw on stderr,
            // the summary goes to stdout.
            println!("{}", result.summary_line());
        })
        .await;

    let ok = results.iter().filter(|r| r.is_ok()).count();
    info!(
        completed = ok,
        failed = results.len() - ok,
        total = results.len(),
        "all downloads finished"
    );

    // Best-effort batch semantics: individual failures are reported in the
    // summary, not through the exit status.
    Ok(())
}
