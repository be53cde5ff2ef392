//! Error types for the download module.
//!
//! Download failures are per-artifact: the pipeline records which descriptor
//! failed and why, and keeps going. These variants carry the context (URL,
//! path, descriptor identity) that makes a failure report actionable.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching one archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create directory, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The descriptor lacks a field the download needs.
    ///
    /// The lister maps API records permissively, so a record without a
    /// `name` or `zipball_url` reaches the pipeline as a descriptor with
    /// `None` fields and is rejected here, per item.
    #[error("incomplete descriptor from {repository}: missing {missing}")]
    IncompleteDescriptor {
        /// Repository the descriptor came from, as `owner/name`.
        repository: String,
        /// The record id, when the record carried one.
        id: Option<u64>,
        /// Which required field was absent.
        missing: &'static str,
    },
}

impl DownloadError {
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

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an incomplete-descriptor error.
    pub fn incomplete_descriptor(
        repository: impl Into<String>,
        id: Option<u64>,
        missing: &'static str,
    ) -> Self {
        Self::IncompleteDescriptor {
            repository: repository.into(),
            id,
            missing,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or `From<std::io::Error>`
// because our error variants require context (url, path) that the source errors
// don't provide. The helper constructor methods (network(), io(), etc.) are the
// correct pattern here as they allow callers to provide necessary context.
