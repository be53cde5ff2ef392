//! Authenticated GitHub API client returning normalized response envelopes.
//!
//! [`ApiClient`] wraps a reqwest client configured once (timeouts, gzip,
//! User-Agent) and exposes a single operation: fetch one URL and normalize
//! the response into a [`RequestEnvelope`] of payload, rate-limit snapshot,
//! and parsed pagination links.
//!
//! The executor deliberately does not judge the payload: a `404` body like
//! `{"message": "Not Found"}` is transported back as ordinary `data`, and no
//! rate-limit bookkeeping happens here. Both concerns belong to the callers
//! (the scraper's collection operations), which keeps single-page fetches
//! cheap for raw use.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK};
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::ScrapeError;
use super::link::{PaginationLink, parse_link_header};
use super::rate_limit::RateLimitSnapshot;
use crate::user_agent;

/// Default GitHub API root, prefixed to `repos/{owner}/{name}/...` paths.
pub const DEFAULT_API_ROOT: &str = "https://api.github.com";

/// Media type pinning the GitHub REST API version.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Default HTTP connect timeout for API calls (10 seconds).
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout for API calls (30 seconds).
const READ_TIMEOUT_SECS: u64 = 30;

/// A normalized API response: payload, rate-limit counters, pagination links.
///
/// `links` is `Some` iff the server sent a `Link` header; an empty header
/// yields `Some(empty map)`. Use [`RequestEnvelope::link`] to look up a
/// relation, which treats both cases as "no such relation". `data` is always
/// present but may be an API error payload rather than the requested
/// resource; collection operations inspect it before trusting it.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// The decoded JSON body, array or object.
    pub data: Value,
    /// Rate-limit counters parsed from the response headers.
    pub rate_limit: RateLimitSnapshot,
    /// Parsed `Link` header relations, when the header was present.
    pub links: Option<HashMap<String, PaginationLink>>,
}

impl RequestEnvelope {
    /// Looks up a pagination relation (`"next"`, `"last"`, and friends).
    ///
    /// Returns `None` when the header was absent, empty, or lacked the
    /// relation; the three cases are equivalent for pagination decisions.
    #[must_use]
    pub fn link(&self, relation: &str) -> Option<&PaginationLink> {
        self.links.as_ref()?.get(relation)
    }
}

/// Authenticated HTTP client for the GitHub REST API.
///
/// Created once and reused across all page fetches (connection pooling).
/// The token is sent as `Authorization: Token {token}` on every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    token: String,
}

impl ApiClient {
    /// Creates a new API client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(token: impl Into<String>) -> Self {
        Self::new_with_timeouts(token, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new API client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(
        token: impl Into<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::api_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            token: token.into(),
        }
    }

    /// Fetches one URL and normalizes the response into an envelope.
    ///
    /// Sends the stored credential plus the fixed API version marker:
    /// `Authorization: Token {token}`, `Accept: application/vnd.github.v3+json`,
    /// `Content-Type: application/json`.
    ///
    /// A non-2xx status is NOT an error at this layer: GitHub reports API
    /// problems as JSON bodies (`{"message": ...}`), and those come back as
    /// `data` for the caller to inspect.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Network`] or [`ScrapeError::Timeout`] when the
    /// exchange cannot complete, and [`ScrapeError::Decode`] when the body is
    /// not JSON.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_response(&self, url: &str) -> Result<RequestEnvelope, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrapeError::timeout(url)
                } else {
                    ScrapeError::network(url, e)
                }
            })?;

        let status = response.status();
        let rate_limit = RateLimitSnapshot::from_headers(response.headers());
        let links = parse_link_header(
            response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok()),
        );

        debug!(
            status = status.as_u16(),
            used = ?rate_limit.used,
            remaining = ?rate_limit.remaining,
            has_links = links.is_some(),
            "API response received"
        );

        let data = response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::timeout(url)
            } else if e.is_decode() {
                ScrapeError::decode(url, e)
            } else {
                ScrapeError::network(url, e)
            }
        })?;

        Ok(RequestEnvelope {
            data,
            rate_limit,
            links,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    // The token must never reach logs or error output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}
