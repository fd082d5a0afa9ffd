//! Anti-bot challenge handling for the archive session.
//!
//! The archive sits behind Cloudflare, which occasionally answers with a
//! JavaScript interstitial instead of the page. Clearing such a challenge
//! requires a browser engine, so the client delegates it to a
//! [`ChallengeSolver`]. The bundled [`BrowserSession`] only makes requests
//! look like a browser session and recognizes interstitials so they are
//! reported as [`FetchError::Challenge`](super::FetchError::Challenge)
//! instead of being retried as ordinary 503s.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, SERVER};
use reqwest::{Client, StatusCode};
use tracing::warn;

/// Header Cloudflare sets on challenge responses.
const CF_MITIGATED: &str = "cf-mitigated";

/// Body markers of a Cloudflare interstitial page.
const CHALLENGE_BODY_MARKERS: &[&str] = &[
    "Just a moment...",
    "challenge-platform",
    "cf-browser-verification",
];

/// Pluggable anti-bot capability of the HTTP client.
#[async_trait]
pub trait ChallengeSolver: Send + Sync + Debug {
    /// Headers sent with every request of the session.
    fn default_headers(&self) -> HeaderMap;

    /// Returns true when a non-success response is an anti-bot interstitial.
    fn is_challenge(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> bool;

    /// Attempts to clear the challenge, typically by storing clearance
    /// cookies in the session. Returning true makes the client send the
    /// original request once more.
    async fn solve(&self, client: &Client, url: &str, body: &[u8]) -> bool;
}

/// Browser-like session without a JavaScript engine.
#[derive(Debug, Clone, Default)]
pub struct BrowserSession;

impl BrowserSession {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChallengeSolver for BrowserSession {
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }

    fn is_challenge(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> bool {
        let mitigated = headers
            .get(CF_MITIGATED)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("challenge"));
        if mitigated {
            return true;
        }

        if !matches!(
            status,
            StatusCode::FORBIDDEN | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return false;
        }
        let behind_cloudflare = headers
            .get(SERVER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("cloudflare"));
        if !behind_cloudflare {
            return false;
        }
        let body = String::from_utf8_lossy(body);
        CHALLENGE_BODY_MARKERS
            .iter()
            .any(|marker| body.contains(marker))
    }

    async fn solve(&self, _client: &Client, url: &str, _body: &[u8]) -> bool {
        warn!(
            url = %url,
            "anti-bot challenge cannot be cleared without a browser engine"
        );
        false
    }
}
