//! Resumable HTTP downloads driven by a bounded worker pool.
//!
//! This module provides two layers:
//!
//! - [`HttpClient`] streams a single file to disk, resuming from an existing
//!   partial file via HTTP range requests when the server supports them.
//! - [`DownloadPool`] runs many fetches concurrently with a fixed worker
//!   count, a 30-second deadline per job, and a results channel drained in
//!   completion order.
//!
//! # Example
//!
//! ```no_run
//! use parfetch::{DownloadPool, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let pool = DownloadPool::new(3)?;
//! let urls = vec!["https://example.com/file.bin".to_string()];
//! let results = pool
//!     .run(&client, Path::new("."), urls, None, |res| {
//!         println!("{}", res.summary_line());
//!     })
//!     .await;
//! # let _ = results;
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod pool;
mod progress;

pub use client::{FetchReport, HttpClient};
pub use constants::{DEFAULT_CONCURRENCY, JOB_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::filename_from_url;
pub use pool::{DownloadJob, DownloadPool, DownloadResult, PoolError};
