//! CLI argument definitions using clap derive macros.

use clap::Parser;

use parfetch::DEFAULT_CONCURRENCY;

/// Download many files concurrently, resuming partial downloads.
///
/// Each URL is fetched by a bounded worker pool and saved in the current
/// directory under the last segment of its path. Partially-downloaded files
/// are resumed with HTTP range requests when the server supports them.
#[derive(Parser, Debug)]
#[command(name = "parfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// URLs to download
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,
}
