//! Error types for the HTTP client.
//!
//! Every variant carries the URL it relates to so the single log line the
//! client emits on failure is enough to identify the skipped item.

use thiserror::Error;

/// Errors that can occur while fetching a page or file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the per-request timeout.
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Non-success status, after any retries were exhausted.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        url: String,
        status: u16,
        /// Raw Retry-After header value, if the server sent one.
        retry_after: Option<String>,
    },

    /// The URL could not be parsed as an absolute http(s) URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The site answered with an anti-bot interstitial the session could not clear.
    #[error("anti-bot challenge (HTTP {status}) fetching {url}")]
    Challenge { url: String, status: u16 },

    /// The server returned a success status with no body.
    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after: None,
        }
    }

    pub fn http_status_with_retry_after(
        url: impl Into<String>,
        status: u16,
        retry_after: Option<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn challenge(url: impl Into<String>, status: u16) -> Self {
        Self::Challenge {
            url: url.into(),
            status,
        }
    }

    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates a client construction error from a reqwest builder failure.
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }

    /// HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } | Self::Challenge { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>`: every variant needs the URL, which the source
// error does not reliably carry. Use the constructors above.
