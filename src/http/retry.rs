//! Retry decisions with exponential backoff for transient HTTP statuses.
//!
//! Only idempotent reads (`GET`, `HEAD`) are retried, and only when the
//! server answered with one of [`RETRYABLE_STATUSES`]. Transport failures and
//! every other status are final on the first attempt.
//!
//! # Delay Calculation
//!
//! ```text
//! delay(retry) = backoff_factor * 2^(retry - 1)
//! ```
//!
//! With the default factor of 0.5 the waits are 0.5s, 1s, 2s. A Retry-After
//! header on 429/503 replaces the computed delay.

use std::time::Duration;

use reqwest::Method;
use tracing::{debug, instrument, warn};

use super::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, MAX_RETRY_AFTER, RETRY_AFTER_STATUSES,
    RETRYABLE_STATUSES,
};

/// Decision on whether to retry a failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Send the request again after `delay`.
    Retry {
        delay: Duration,
        /// 1-indexed number of the retry about to happen.
        retry: u32,
    },
    /// Give up and report the last response as a failure.
    DoNotRetry { reason: String },
}

/// Retry budget and backoff configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    max_retries: u32,
    /// Backoff factor in seconds.
    backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. Negative or non-finite factors are treated as 0.
    #[must_use]
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        let backoff_factor = if backoff_factor.is_finite() && backoff_factor > 0.0 {
            backoff_factor
        } else {
            0.0
        };
        Self {
            max_retries,
            backoff_factor,
        }
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Decides whether the request that just got `status` should be retried.
    ///
    /// `retries_done` is the number of retries already performed (0 after the
    /// initial attempt).
    #[instrument(skip(self), fields(max_retries = self.max_retries))]
    pub fn should_retry(&self, method: &Method, status: u16, retries_done: u32) -> RetryDecision {
        if !is_idempotent(method) {
            return RetryDecision::DoNotRetry {
                reason: format!("{method} is not retried"),
            };
        }
        if !is_retryable_status(status) {
            return RetryDecision::DoNotRetry {
                reason: format!("HTTP {status} is not transient"),
            };
        }
        if retries_done >= self.max_retries {
            debug!(retries_done, "retry budget exhausted");
            return RetryDecision::DoNotRetry {
                reason: format!("max retries ({}) exhausted", self.max_retries),
            };
        }

        let retry = retries_done + 1;
        RetryDecision::Retry {
            delay: self.backoff_delay(retry),
            retry,
        }
    }

    /// Backoff before the given 1-indexed retry.
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        Duration::try_from_secs_f64(seconds).unwrap_or(MAX_RETRY_AFTER)
    }
}

/// Returns true for the statuses retried with backoff.
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Returns true for the read-only methods eligible for retries.
#[must_use]
pub fn is_idempotent(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Returns true when a Retry-After header should override the backoff for `status`.
#[must_use]
pub fn honors_retry_after(status: u16) -> bool {
    RETRY_AFTER_STATUSES.contains(&status)
}

/// Parses a Retry-After header value into a Duration.
///
/// Supports both RFC 7231 forms:
/// - Integer seconds: `Retry-After: 120`
/// - HTTP-date: `Retry-After: Wed, 21 Oct 2025 07:28:00 GMT`
///
/// Returns `None` if the value cannot be parsed. Values above
/// [`MAX_RETRY_AFTER`] are capped.
///
/// ```
/// use std::time::Duration;
/// use midi_downloader::http::parse_retry_after;
///
/// assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
/// assert_eq!(parse_retry_after("soon"), None);
/// ```
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        let Ok(seconds) = u64::try_from(seconds) else {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        };
        return Some(cap_retry_after(Duration::from_secs(seconds)));
    }

    match httpdate::parse_http_date(header_value) {
        Ok(datetime) => Some(
            datetime
                .duration_since(std::time::SystemTime::now())
                .map_or(Duration::ZERO, cap_retry_after),
        ),
        Err(_) => {
            debug!(header_value, "unparseable Retry-After value");
            None
        }
    }
}

fn cap_retry_after(duration: Duration) -> Duration {
    if duration > MAX_RETRY_AFTER {
        warn!(
            delay_secs = duration.as_secs(),
            max_secs = MAX_RETRY_AFTER.as_secs(),
            "Retry-After exceeds maximum, capping"
        );
        return MAX_RETRY_AFTER;
    }
    duration
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert!((policy.backoff_factor() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retry_policy_negative_factor_clamped_to_zero() {
        let policy = RetryPolicy::new(2, -1.0);
        assert_eq!(policy.backoff_delay(1), Duration::ZERO);
        let policy = RetryPolicy::new(2, f64::NAN);
        assert_eq!(policy.backoff_delay(3), Duration::ZERO);
    }

    #[test]
    fn test_backoff_delay_doubles_each_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(2));
    }

    #[test]
    fn test_should_retry_transient_status_within_budget() {
        let policy = RetryPolicy::new(3, 0.5);
        assert_eq!(
            policy.should_retry(&Method::GET, 503, 0),
            RetryDecision::Retry {
                delay: Duration::from_millis(500),
                retry: 1,
            }
        );
        assert_eq!(
            policy.should_retry(&Method::GET, 429, 2),
            RetryDecision::Retry {
                delay: Duration::from_secs(2),
                retry: 3,
            }
        );
    }

    #[test]
    fn test_should_retry_stops_when_budget_exhausted() {
        let policy = RetryPolicy::new(3, 0.5);
        assert!(matches!(
            policy.should_retry(&Method::GET, 503, 3),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_should_retry_zero_budget_never_retries() {
        let policy = RetryPolicy::new(0, 0.5);
        assert!(matches!(
            policy.should_retry(&Method::GET, 500, 0),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_should_not_retry_permanent_statuses() {
        let policy = RetryPolicy::default();
        for status in [400, 401, 403, 404, 410, 501] {
            assert!(
                matches!(
                    policy.should_retry(&Method::GET, status, 0),
                    RetryDecision::DoNotRetry { .. }
                ),
                "status {status} must not be retried"
            );
        }
    }

    #[test]
    fn test_should_not_retry_non_idempotent_methods() {
        let policy = RetryPolicy::default();
        match policy.should_retry(&Method::POST, 503, 0) {
            RetryDecision::DoNotRetry { reason } => assert!(reason.contains("POST")),
            other => panic!("expected DoNotRetry, got {other:?}"),
        }
        assert!(matches!(
            policy.should_retry(&Method::HEAD, 503, 0),
            RetryDecision::Retry { .. }
        ));
    }

    #[test]
    fn test_honors_retry_after_only_for_429_and_503() {
        assert!(honors_retry_after(429));
        assert!(honors_retry_after(503));
        assert!(!honors_retry_after(500));
        assert!(!honors_retry_after(504));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        assert_eq!(parse_retry_after("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
    }

    #[test]
    fn test_parse_retry_after_negative_and_invalid() {
        assert_eq!(parse_retry_after("-5"), None);
        assert_eq!(parse_retry_after("later"), None);
        assert_eq!(parse_retry_after(""), None);
    }

    #[test]
    fn test_parse_retry_after_caps_large_values() {
        assert_eq!(parse_retry_after("86400"), Some(MAX_RETRY_AFTER));
    }

    #[test]
    fn test_parse_retry_after_past_http_date_is_zero() {
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"),
            Some(Duration::ZERO)
        );
    }
}
