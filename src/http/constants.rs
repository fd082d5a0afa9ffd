//! Constants for the HTTP client (timeouts, retry, rate limiting).

use std::time::Duration;

/// Default per-request timeout (30 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default minimum delay between two requests from the same client.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(1);

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default exponential backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

/// Status codes that are retried with backoff.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Status codes for which a Retry-After header overrides the backoff delay.
pub const RETRY_AFTER_STATUSES: [u16; 2] = [429, 503];

/// Maximum Retry-After value honored, to keep a single item from stalling the run.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// Root of the archive; relative links on listing pages resolve against it.
pub const DEFAULT_SITE_ROOT: &str = "https://www.khinsider.com";
