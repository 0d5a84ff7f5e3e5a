//! Worker pool coordinating concurrent downloads.
//!
//! This module provides the `DownloadPool`, which fans a list of URLs out to
//! a fixed set of worker tasks and fans the results back in over a single
//! channel. The queue is fully populated and closed before workers start
//! consuming, each fetch runs under an independent 30-second deadline, and
//! results reach the collector in completion order.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::MultiProgress;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

use super::client::{FetchReport, HttpClient};
use super::constants::{DEFAULT_CONCURRENCY, JOB_TIMEOUT_SECS};
use super::error::DownloadError;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Error type for pool construction.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// A unit of work: one URL to download.
///
/// The destination filename is derived from the URL's last path segment, so
/// two jobs with colliding segments write to the same local file. That race
/// is an accepted limitation of the naming scheme.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// The remote resource to fetch.
    pub url: String,
}

/// Outcome of one job, produced exactly once per URL.
#[derive(Debug)]
pub struct DownloadResult {
    /// The URL this result belongs to.
    pub url: String,
    /// Success metadata or the failure reason.
    pub outcome: Result<FetchReport, DownloadError>,
}

impl DownloadResult {
    /// Returns true when the download succeeded (including already-complete).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Formats the summary line for this result: `[OK]   <url>` or
    /// `[FAIL] <url>: <error>`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            Ok(_) => format!("[OK]   {}", self.url),
            Err(e) => format!("[FAIL] {}: {e}", self.url),
        }
    }
}

/// Fixed-size pool of concurrent download workers.
///
/// # Concurrency Model
///
/// - Exactly N worker tasks are spawned; each pulls jobs from a shared
///   channel until it is drained, then exits cleanly
/// - The job channel is fully populated and its sender dropped before any
///   worker consumes, so the drain is deterministic
/// - Each fetch runs under its own deadline; expiry fails that job only
/// - Workers are independent: one failure never cancels a sibling
/// - Results flow through an N-producer single-consumer channel that closes
///   when the last worker exits, ending the collector loop
#[derive(Debug)]
pub struct DownloadPool {
    /// Configured worker count.
    concurrency: usize,
    /// Hard deadline for a single fetch (connect + headers + body).
    job_timeout: Duration,
}

impl DownloadPool {
    /// Creates a pool with the given worker count and the default 30-second
    /// per-job deadline.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConcurrency`] if the value is outside the
    /// valid range (1-100).
    pub fn new(concurrency: usize) -> Result<Self, PoolError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(PoolError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self {
            concurrency,
            job_timeout: Duration::from_secs(JOB_TIMEOUT_SECS),
        })
    }

    /// Overrides the per-job deadline. Intended for tests and embedders that
    /// know their transfer sizes.
    #[must_use]
    pub fn with_job_timeout(mut self, job_timeout: Duration) -> Self {
        self.job_timeout = job_timeout;
        self
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the per-job deadline.
    #[must_use]
    pub fn job_timeout(&self) -> Duration {
        self.job_timeout
    }

    /// Runs every URL to completion and returns one result per URL.
    ///
    /// `on_result` is invoked for each result as it arrives, before the run
    /// finishes, so callers can stream summary lines in completion order.
    /// Completion order is nondeterministic across runs; only the count is
    /// guaranteed (exactly one result per input URL).
    ///
    /// Individual download failures do not fail the run; they are carried in
    /// the returned results. Worker panics are logged at join time and never
    /// hang the collector: the results channel closes once the last worker
    /// is gone, panicked or not.
    #[instrument(skip(self, client, urls, progress, on_result), fields(jobs = urls.len()))]
    pub async fn run<F>(
        &self,
        client: &HttpClient,
        output_dir: &Path,
        urls: Vec<String>,
        progress: Option<MultiProgress>,
        mut on_result: F,
    ) -> Vec<DownloadResult>
    where
        F: FnMut(&DownloadResult),
    {
        let job_count = urls.len();
        if job_count == 0 {
            return Vec::new();
        }

        info!(jobs = job_count, workers = self.concurrency, "starting download run");

        // Feed the queue up front, then close it by dropping the sender.
        let (job_tx, job_rx) = mpsc::channel::<DownloadJob>(job_count);
        for url in urls {
            // Capacity equals the job count, so this never awaits.
            if job_tx.send(DownloadJob { url }).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<DownloadResult>(job_count);

        let mut handles = Vec::with_capacity(self.concurrency);
        for worker_id in 0..self.concurrency {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let client = client.clone();
            let output_dir = output_dir.to_path_buf();
            let progress = progress.clone();
            let job_timeout = self.job_timeout;

            handles.push(tokio::spawn(async move {
                loop {
                    // Hold the lock only while receiving, not during the fetch.
                    let job = { job_rx.lock().await.recv().await };
                    let Some(job) = job else {
                        debug!(worker_id, "job queue drained, worker exiting");
                        break;
                    };

                    debug!(worker_id, url = %job.url, "job started");
                    let outcome = fetch_with_deadline(
                        &client,
                        &job.url,
                        &output_dir,
                        progress.as_ref(),
                        job_timeout,
                    )
                    .await;

                    let result = DownloadResult {
                        url: job.url,
                        outcome,
                    };
                    if result_tx.send(result).await.is_err() {
                        // Collector dropped the receiver; nothing left to report.
                        break;
                    }
                }
            }));
        }
        // Workers hold the remaining senders; the channel closes when the
        // last one exits, which is what ends the collection loop below.
        drop(result_tx);

        let mut results = Vec::with_capacity(job_count);
        while let Some(result) = result_rx.recv().await {
            on_result(&result);
            results.push(result);
        }

        // All senders are gone, so the workers have already exited; joining
        // here only surfaces panics.
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "download worker panicked");
            }
        }

        let ok = results.iter().filter(|r| r.is_ok()).count();
        info!(
            completed = ok,
            failed = results.len() - ok,
            total = results.len(),
            "download run complete"
        );

        results
    }
}

impl Default for DownloadPool {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            job_timeout: Duration::from_secs(JOB_TIMEOUT_SECS),
        }
    }
}

/// Runs one fetch under a hard deadline; expiry becomes a `Timeout` failure
/// for that job alone.
async fn fetch_with_deadline(
    client: &HttpClient,
    url: &str,
    output_dir: &Path,
    progress: Option<&MultiProgress>,
    deadline: Duration,
) -> Result<FetchReport, DownloadError> {
    match tokio::time::timeout(deadline, client.fetch(url, output_dir, progress)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(url = %url, timeout_secs = deadline.as_secs(), "download deadline expired");
            Err(DownloadError::timeout(url))
        }
    }
}
