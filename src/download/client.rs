//! HTTP client wrapper for resumable streaming downloads.
//!
//! This module provides the `HttpClient` struct which handles a single
//! download end to end: it checks how much of the destination file already
//! exists, asks the server for the remaining bytes via a range request, and
//! streams the response body to disk from the correct offset.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::MultiProgress;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, RANGE};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::DownloadError;
use super::filename::filename_from_url;
use super::progress::transfer_bar;

/// HTTP client for resumable streaming downloads.
///
/// This client is designed to be created once and reused for multiple
/// downloads, taking advantage of connection pooling. Only the connection
/// phase carries a timeout here; callers bound the whole attempt externally
/// (the pool wraps each fetch in a 30-second deadline).
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome metadata for a finished fetch.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Final output path.
    pub path: PathBuf,
    /// File size after the fetch (existing bytes plus bytes received).
    pub bytes_on_disk: u64,
    /// Whole-file size when the server declared a content length.
    pub total_length: Option<u64>,
    /// Byte offset the transfer actually started from (0 unless the server
    /// honored the range request with 206).
    pub resumed_from: u64,
    /// True when the server answered 416: the local file already holds the
    /// complete resource and nothing was written.
    pub already_complete: bool,
}

impl HttpClient {
    /// Creates a new HTTP client with the default connect timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with an explicit connect timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads `url` into `output_dir`, resuming an existing partial file.
    ///
    /// The destination filename is the last path segment of the URL. If the
    /// destination already holds bytes, the request carries a
    /// `Range: bytes=<size>-` header and the response decides what happens:
    ///
    /// - `416` - the file is already complete; nothing is written
    /// - `206` - the server sends the missing tail; bytes are appended
    /// - `200` - the server ignored the range; the file is truncated and
    ///   rewritten from byte 0 (silent downgrade, not an error)
    ///
    /// Progress is reported against the whole file: the bar starts at the
    /// resume offset and its total includes bytes already on disk.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails,
    /// the server returns a status outside {200, 206, 416}, or writing to
    /// disk fails. Partial files are left in place so a later run can
    /// resume them.
    #[instrument(skip(self, progress), fields(url = %url))]
    pub async fn fetch(
        &self,
        url: &str,
        output_dir: &Path,
        progress: Option<&MultiProgress>,
    ) -> Result<FetchReport, DownloadError> {
        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let file_name = filename_from_url(&parsed_url);
        let dest_path = output_dir.join(&file_name);

        // Local state: the resume offset candidate is whatever is on disk now.
        let existing_bytes = tokio::fs::metadata(&dest_path)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);

        let mut request = self.client.get(url);
        if existing_bytes > 0 {
            request = request.header(RANGE, format!("bytes={existing_bytes}-"));
            debug!(offset = existing_bytes, "requesting remaining bytes");
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        let (resume_offset, append) = match status.as_u16() {
            // Local file already covers the server's view of the resource.
            416 => {
                info!(path = %dest_path.display(), bytes = existing_bytes, "already complete");
                return Ok(FetchReport {
                    path: dest_path,
                    bytes_on_disk: existing_bytes,
                    total_length: Some(existing_bytes),
                    resumed_from: existing_bytes,
                    already_complete: true,
                });
            }
            206 => (existing_bytes, true),
            // Server ignored or does not support ranges: full re-download.
            200 => (0, false),
            _ => return Err(DownloadError::http_status(url, status)),
        };

        if append {
            info!(path = %dest_path.display(), offset = resume_offset, "resuming download");
        }

        let file = open_destination(&dest_path, append).await?;
        let total_length = total_content_length(&response, resume_offset);

        let bar = transfer_bar(progress, &file_name, total_length, resume_offset);
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| {
                if e.is_timeout() {
                    DownloadError::timeout(url)
                } else {
                    DownloadError::network(url, e)
                }
            })?;

            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(dest_path.clone(), e))?;

            bytes_written += chunk.len() as u64;
            bar.inc(chunk.len() as u64);
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::io(dest_path.clone(), e))?;
        bar.finish_and_clear();

        let bytes_on_disk = resume_offset.saturating_add(bytes_written);
        info!(
            path = %dest_path.display(),
            bytes = bytes_on_disk,
            resumed = append,
            "download complete"
        );

        Ok(FetchReport {
            path: dest_path,
            bytes_on_disk,
            total_length,
            resumed_from: resume_offset,
            already_complete: false,
        })
    }
}

/// Opens the destination file: append-without-truncate when resuming,
/// create-or-truncate otherwise. Mode 0644 on Unix.
async fn open_destination(path: &Path, append: bool) -> Result<tokio::fs::File, DownloadError> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    #[cfg(unix)]
    options.mode(0o644);

    options
        .open(path)
        .await
        .map_err(|e| DownloadError::io(path.to_path_buf(), e))
}

/// Derives the whole-file length for progress reporting.
///
/// A 206 response declares only the remaining bytes, so the resume offset is
/// added back. A missing Content-Length yields `None` (indeterminate total).
fn total_content_length(response: &reqwest::Response, resume_offset: u64) -> Option<u64> {
    let declared = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())?;
    if response.status().as_u16() == 206 {
        Some(declared.saturating_add(resume_offset))
    } else {
        Some(declared)
    }
}
