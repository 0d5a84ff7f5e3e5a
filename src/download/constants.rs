//! Constants for the download module (timeouts, pool sizing).

/// Default HTTP connect timeout (10 seconds).
///
/// Only the connection phase is bounded here; the full attempt (connect +
/// headers + body transfer) is bounded by the pool's per-job deadline.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Hard deadline for a single download attempt (30 seconds).
pub const JOB_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent downloads if not specified.
pub const DEFAULT_CONCURRENCY: usize = 3;
