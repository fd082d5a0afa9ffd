//! HTTP access to the archive.
//!
//! # Features
//!
//! - Minimum spacing between consecutive requests ([`RateLimiter`])
//! - Exponential backoff on 429/500/502/503/504 ([`RetryPolicy`])
//! - Retry-After support for 429/503
//! - Browser-like cookie session with a pluggable anti-bot hook ([`ChallengeSolver`])
//! - Per-request timeout (30s by default)
//!
//! Callers use [`KhinsiderClient::fetch_text`] for pages and
//! [`KhinsiderClient::fetch_bytes`] for files; both return `None` on failure.

mod client;
pub mod constants;
mod error;
mod rate_limiter;
mod retry;
mod session;

pub use client::{ClientConfig, KhinsiderClient};
pub use error::FetchError;
pub use rate_limiter::RateLimiter;
pub use retry::{RetryDecision, RetryPolicy, is_retryable_status, parse_retry_after};
pub use session::{BrowserSession, ChallengeSolver};
