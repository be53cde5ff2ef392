//! Error types for API enumeration.
//!
//! This module defines structured errors for the request executor and the
//! pagination/listing operations built on it. Transport-level failures are
//! distinguished from API-level error bodies: the executor only fails when
//! the exchange itself could not complete, while collection operations
//! additionally reject payloads that are not the expected JSON array.

use thiserror::Error;

/// Errors that can occur while fetching or enumerating API collections.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The response body could not be decoded as JSON.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with an error payload instead of a collection.
    ///
    /// Carries the server's `message` field (e.g. "Not Found", "API rate
    /// limit exceeded"). Raised by collection operations when they inspect
    /// the payload, never by the raw executor.
    #[error("API error from {url}: {message}")]
    Api {
        /// The URL that produced the error payload.
        url: String,
        /// The server-reported message.
        message: String,
    },

    /// The payload was not an array and carried no recognizable API error.
    #[error("expected a JSON array from {url}")]
    UnexpectedPayload {
        /// The URL that produced the payload.
        url: String,
    },

    /// The `Link` header named a `last` relation without a usable page number.
    #[error("cannot paginate {url}: {reason}")]
    Pagination {
        /// The collection URL being paginated.
        url: String,
        /// What made the header unusable.
        reason: String,
    },
}

impl ScrapeError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a decode error from a reqwest error.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an API error from a server-reported message.
    pub fn api(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an unexpected-payload error.
    pub fn unexpected_payload(url: impl Into<String>) -> Self {
        Self::UnexpectedPayload { url: url.into() }
    }

    /// Creates a pagination error.
    pub fn pagination(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pagination {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` because the
// variants require the request URL for context, which the source error does
// not reliably provide. The helper constructors are the pattern here.
