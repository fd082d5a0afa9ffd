//! Rate-limited, retrying HTTP client for the archive.
//!
//! [`KhinsiderClient`] owns one reqwest session (connection pool plus cookie
//! store) for the whole run. Every request waits for the rate limiter first;
//! transient statuses are retried per [`RetryPolicy`]. Failures never escape
//! [`KhinsiderClient::fetch_bytes`] / [`KhinsiderClient::fetch_text`]: they
//! are logged once and reported as `None`, which callers treat as "skip this
//! item".

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_RATE_LIMIT_DELAY, REQUEST_TIMEOUT_SECS,
};
use super::error::FetchError;
use super::rate_limiter::RateLimiter;
use super::retry::{RetryDecision, RetryPolicy, honors_retry_after, parse_retry_after};
use super::session::{BrowserSession, ChallengeSolver};
use crate::user_agent;

/// Tunables for [`KhinsiderClient`].
///
/// # Default Values
///
/// - `rate_limit_delay`: 1 second
/// - `max_retries`: 3
/// - `backoff_factor`: 0.5
/// - `user_agent`: built-in (`Mozilla/5.0 (compatible; MIDIDownloader/<version>)`)
/// - `timeout`: 30 seconds
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub rate_limit_delay: Duration,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub user_agent: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            user_agent: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Sets the delay from fractional seconds; negative or non-finite values disable it.
    #[must_use]
    pub fn with_rate_limit_secs(self, seconds: f64) -> Self {
        let delay = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        self.with_rate_limit_delay(delay)
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Overrides the User-Agent. Blank values keep the default.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent.filter(|ua| !ua.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(user_agent::default_user_agent)
    }
}

/// HTTP client with rate limiting, retries and a browser-like session.
///
/// Created once per run and released with [`close`](Self::close) (or by
/// dropping it, which also happens on early return).
///
/// # Example
///
/// ```no_run
/// use midi_downloader::http::{ClientConfig, KhinsiderClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = KhinsiderClient::new(ClientConfig::default())?;
/// if let Some(html) = client.fetch_text("https://www.khinsider.com/midi/gameboy").await {
///     println!("{} bytes of HTML", html.len());
/// }
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KhinsiderClient {
    client: Client,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
    solver: Arc<dyn ChallengeSolver>,
}

impl KhinsiderClient {
    /// Creates a client using the bundled [`BrowserSession`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the reqwest client cannot be built
    /// (e.g. the configured User-Agent is not a valid header value).
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        Self::with_solver(config, Arc::new(BrowserSession::new()))
    }

    /// Creates a client with a custom anti-bot solver.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the reqwest client cannot be built.
    #[instrument(level = "debug", skip(solver))]
    pub fn with_solver(
        config: ClientConfig,
        solver: Arc<dyn ChallengeSolver>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .cookie_store(true)
            .user_agent(config.effective_user_agent())
            .default_headers(solver.default_headers())
            .build()
            .map_err(FetchError::client_build)?;

        debug!(
            delay_ms = config.rate_limit_delay.as_millis(),
            max_retries = config.max_retries,
            "HTTP session created"
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.rate_limit_delay),
            retry_policy: RetryPolicy::new(config.max_retries, config.backoff_factor),
            solver,
        })
    }

    /// Fetches `url` and returns the body, or `None` after logging the failure.
    pub async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
        match self.try_fetch_bytes(url).await {
            Ok(body) => Some(body),
            Err(error) => {
                warn!(url = %url, error = %error, "Request failed");
                None
            }
        }
    }

    /// Fetches `url` as text (UTF-8, invalid sequences replaced), or `None`
    /// after logging the failure.
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        self.fetch_bytes(url)
            .await
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetches `url`, returning the typed failure instead of logging it.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] for anything that is not an absolute http(s) URL
    /// - [`FetchError::Network`] / [`FetchError::Timeout`] for transport failures
    /// - [`FetchError::HttpStatus`] for non-success statuses once retries are exhausted
    /// - [`FetchError::Challenge`] when an anti-bot interstitial could not be cleared
    /// - [`FetchError::EmptyBody`] for a success status with no body
    #[instrument(skip(self), fields(url = %url))]
    pub async fn try_fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        validate_url(url)?;

        let mut retries_done = 0u32;
        let mut challenge_attempted = false;

        loop {
            self.rate_limiter.acquire().await;
            debug!(retries_done, "sending request");

            let response = self.client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::timeout(url)
                } else {
                    FetchError::network(url, e)
                }
            })?;

            let status = response.status();
            if status.is_success() {
                let body = response.bytes().await.map_err(|e| {
                    if e.is_timeout() {
                        FetchError::timeout(url)
                    } else {
                        FetchError::network(url, e)
                    }
                })?;
                if body.is_empty() {
                    return Err(FetchError::empty_body(url));
                }
                debug!(bytes = body.len(), "request succeeded");
                return Ok(body.to_vec());
            }

            let status_code = status.as_u16();
            let headers = response.headers().clone();
            let retry_after = headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(std::string::ToString::to_string);
            // Only needed for challenge detection; a truncated body just means no match.
            let body = response.bytes().await.unwrap_or_default();

            if self.solver.is_challenge(status, &headers, &body) {
                if !challenge_attempted && self.solver.solve(&self.client, url, &body).await {
                    challenge_attempted = true;
                    info!(url = %url, "anti-bot challenge cleared, re-sending request");
                    continue;
                }
                return Err(FetchError::challenge(url, status_code));
            }

            match self
                .retry_policy
                .should_retry(&Method::GET, status_code, retries_done)
            {
                RetryDecision::Retry { delay, retry } => {
                    let server_delay = honors_retry_after(status_code)
                        .then(|| retry_after.as_deref().and_then(parse_retry_after))
                        .flatten();
                    let delay = server_delay.unwrap_or(delay);
                    info!(
                        url = %url,
                        status = status_code,
                        retry,
                        max_retries = self.retry_policy.max_retries(),
                        delay_ms = delay.as_millis(),
                        using_retry_after = server_delay.is_some(),
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    retries_done = retry;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(status = status_code, %reason, "not retrying request");
                    return Err(FetchError::http_status_with_retry_after(
                        url,
                        status_code,
                        retry_after,
                    ));
                }
            }
        }
    }

    /// Returns the retry policy in effect.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the configured inter-request delay.
    #[must_use]
    pub fn rate_limit_delay(&self) -> Duration {
        self.rate_limiter.delay()
    }

    /// Releases the session and its pooled connections.
    pub fn close(self) {
        debug!("closing HTTP session");
        drop(self);
    }
}

fn validate_url(url: &str) -> Result<(), FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(FetchError::invalid_url(url))
    }
}
