//! Parfetch Core Library
//!
//! This library provides the core functionality for the parfetch tool:
//! a concurrent, resumable HTTP file downloader.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - Resumable HTTP fetcher and the worker-pool coordinator
//!
//! The fetcher handles a single file: it detects how much of the file already
//! exists locally, issues a range request when appropriate, and streams the
//! response body to disk from the correct offset. The pool drives many such
//! fetches concurrently with a fixed worker count and a per-job deadline.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;

// Re-export commonly used types
pub use download::{
    DEFAULT_CONCURRENCY, DownloadError, DownloadJob, DownloadPool, DownloadResult, FetchReport,
    HttpClient, PoolError,
};
