//! Rate-limit bookkeeping from `x-ratelimit-*` response headers.
//!
//! Every GitHub API response reports the caller's request budget. The
//! [`RateLimitTracker`] keeps the most recent [`RateLimitSnapshot`] twice
//! over: one *internal* snapshot written by pagination-driving requests, and
//! one *external* snapshot written by caller-facing single fetches, so that
//! bulk enumeration and ad-hoc lookups account separately.
//!
//! Recording is a full overwrite: a snapshot parsed from a response that
//! lacked some headers replaces the old snapshot wholesale, `None` fields
//! included. Merging would let stale counters survive and misreport the
//! remaining budget.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Rate-limit counters from a single API response.
///
/// All fields are `None` when the server omitted the corresponding header
/// (non-API hosts, some error responses). `reset` is Unix epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Requests consumed in the current window (`x-ratelimit-used`).
    pub used: Option<u64>,
    /// Total request budget for the window (`x-ratelimit-limit`).
    pub limit: Option<u64>,
    /// Requests left in the window (`x-ratelimit-remaining`).
    pub remaining: Option<u64>,
    /// Window reset time as Unix epoch seconds (`x-ratelimit-reset`).
    pub reset: Option<u64>,
}

impl RateLimitSnapshot {
    /// Parses the `x-ratelimit-*` headers of a response.
    ///
    /// Absent or non-numeric headers yield `None` fields; this never fails.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            used: header_u64(headers, "x-ratelimit-used"),
            limit: header_u64(headers, "x-ratelimit-limit"),
            remaining: header_u64(headers, "x-ratelimit-remaining"),
            reset: header_u64(headers, "x-ratelimit-reset"),
        }
    }

    /// Whether the server reported an exhausted budget (`remaining` of 0).
    ///
    /// `false` when the header was absent; callers that never saw a
    /// rate-limited response should not be told they are out of budget.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
}

/// The two independent rate-limit snapshots owned by a scraper instance.
///
/// Single-writer by construction: recording takes `&mut self` and the
/// pipeline updates strictly sequentially, so no locking is involved. A
/// caller distributing requests across tasks would need to wrap the tracker
/// in a mutex and serialize updates itself.
#[derive(Debug, Clone, Default)]
pub struct RateLimitTracker {
    internal: RateLimitSnapshot,
    external: RateLimitSnapshot,
}

impl RateLimitTracker {
    /// Creates a tracker with both snapshots empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the internal (pagination-driven) snapshot.
    pub fn record_internal(&mut self, snapshot: RateLimitSnapshot) {
        self.internal = snapshot;
    }

    /// Replaces the external (caller-facing) snapshot.
    pub fn record_external(&mut self, snapshot: RateLimitSnapshot) {
        self.external = snapshot;
    }

    /// Returns the most recent internal snapshot by value.
    #[must_use]
    pub fn internal(&self) -> RateLimitSnapshot {
        self.internal
    }

    /// Returns the most recent external snapshot by value.
    #[must_use]
    pub fn external(&self) -> RateLimitSnapshot {
        self.external
    }
}
