//! Collection enumeration across pagination, with rate-limit bookkeeping.
//!
//! The [`Scraper`] owns one [`ApiClient`] and one [`RateLimitTracker`] and
//! provides the collection-level operations: walk every page of a tags or
//! releases endpoint ([`Scraper::paginate`]), count items
//! ([`Scraper::get_total`]), map records into download descriptors
//! ([`Scraper::list_downloadables`]), and make single caller-facing fetches
//! ([`Scraper::get_results`]).
//!
//! Pages are fetched strictly sequentially in ascending order. That keeps the
//! used/remaining counters meaningful as a ledger of real request order, and
//! it means a mid-run rate-limit exhaustion fails on the next request instead
//! of fanning out many doomed parallel requests.
//!
//! # Example
//!
//! ```no_run
//! use tagscraper_core::github::Scraper;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scraper = Scraper::new("ghp_token");
//! let tags = scraper
//!     .list_downloadables(
//!         "freeCodeCamp/freeCodeCamp",
//!         "https://api.github.com/repos/freeCodeCamp/freeCodeCamp/tags",
//!     )
//!     .await?;
//! println!("{} tags, {:?} requests remaining", tags.len(), scraper.internal_rate_limit().remaining);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::{ApiClient, RequestEnvelope};
use super::error::ScrapeError;
use super::rate_limit::{RateLimitSnapshot, RateLimitTracker};

/// Items requested per collection page.
pub const PER_PAGE: u32 = 100;

/// The minimal description of one downloadable artifact.
///
/// Fields other than `repository` are `Option` because the mapping from API
/// records is deliberately permissive: a record missing `id`, `name`, or
/// `zipball_url` still yields a descriptor, and the download pipeline reports
/// unusable descriptors per item instead of the lister rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downloadable {
    /// Source repository as `owner/name`.
    pub repository: String,
    /// The record's numeric id (releases have one; tags do not).
    pub id: Option<u64>,
    /// Tag or release name; becomes the archive filename stem.
    pub name: Option<String>,
    /// Zipball archive URL.
    pub url: Option<String>,
}

/// Enumerates paginated GitHub collections and tracks rate-limit counters.
///
/// All collection operations take `&mut self`: the tracker is single-writer
/// state updated after every completed request, and the exclusive receiver is
/// what guarantees updates stay strictly sequential.
#[derive(Debug)]
pub struct Scraper {
    client: ApiClient,
    tracker: RateLimitTracker,
}

impl Scraper {
    /// Creates a scraper authenticating with the given API token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(ApiClient::new(token))
    }

    /// Creates a scraper around an already-configured [`ApiClient`].
    #[must_use]
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            tracker: RateLimitTracker::new(),
        }
    }

    /// Fetches one URL raw, without touching either rate-limit snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the executor's transport errors ([`ScrapeError::Network`],
    /// [`ScrapeError::Timeout`], [`ScrapeError::Decode`]).
    pub async fn fetch_response(&self, url: &str) -> Result<RequestEnvelope, ScrapeError> {
        self.client.fetch_response(url).await
    }

    /// Fetches one URL for the caller and records the *external* snapshot.
    ///
    /// The full envelope comes back, so ad-hoc fetches (e.g. a single
    /// "latest release" lookup) stay as capable as pagination while
    /// accounting separately from it.
    ///
    /// # Errors
    ///
    /// Propagates the executor's transport errors.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_results(&mut self, url: &str) -> Result<RequestEnvelope, ScrapeError> {
        let envelope = self.client.fetch_response(url).await?;
        self.tracker.record_external(envelope.rate_limit);
        Ok(envelope)
    }

    /// Collects every record of a paginated collection, in page order.
    ///
    /// Fetches page 0 of `url` (collection URL without a query string) as a
    /// probe. Without a usable `last` relation the probe page is the whole
    /// collection. Otherwise the `last` page number is the exclusive bound
    /// `N` and pages `0..N` are fetched in order. The *internal* rate-limit
    /// snapshot is recorded after every fetch, probe included.
    ///
    /// Pagination is all-or-nothing: a failure on any page discards the
    /// partial result and returns the error.
    ///
    /// # Errors
    ///
    /// Transport errors from any page fetch; [`ScrapeError::Api`] /
    /// [`ScrapeError::UnexpectedPayload`] when a page body is not the
    /// expected array; [`ScrapeError::Pagination`] when the `last` relation
    /// carries no page number.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn paginate(&mut self, url: &str) -> Result<Vec<Value>, ScrapeError> {
        let probe_url = page_url(url, 0);
        let probe = self.client.fetch_response(&probe_url).await?;
        self.tracker.record_internal(probe.rate_limit);

        let Some(last) = probe.link("last") else {
            let items = collection_items(&probe_url, probe.data)?;
            debug!(items = items.len(), "single-page collection");
            return Ok(items);
        };
        let Some(last_page) = last.page else {
            return Err(ScrapeError::pagination(
                url,
                "last relation has no page number",
            ));
        };

        // The loop starts over at page 0, so the probe page is requested a
        // second time and the probe's records are never accumulated. The
        // redundant request buys uniform accumulation across all pages.
        let mut records = Vec::new();
        for page in 0..last_page {
            let current_url = page_url(url, page);
            let envelope = self.client.fetch_response(&current_url).await?;
            self.tracker.record_internal(envelope.rate_limit);
            let items = collection_items(&current_url, envelope.data)?;
            debug!(page, items = items.len(), "fetched collection page");
            records.extend(items);
        }

        debug!(records = records.len(), pages = last_page, "pagination complete");
        Ok(records)
    }

    /// Counts the items of a paginated collection.
    ///
    /// Same page walk, bookkeeping, and failure behavior as
    /// [`Scraper::paginate`], summing page lengths instead of keeping the
    /// records.
    ///
    /// # Errors
    ///
    /// Same as [`Scraper::paginate`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_total(&mut self, url: &str) -> Result<usize, ScrapeError> {
        let probe_url = page_url(url, 0);
        let probe = self.client.fetch_response(&probe_url).await?;
        self.tracker.record_internal(probe.rate_limit);

        let Some(last) = probe.link("last") else {
            return Ok(collection_items(&probe_url, probe.data)?.len());
        };
        let Some(last_page) = last.page else {
            return Err(ScrapeError::pagination(
                url,
                "last relation has no page number",
            ));
        };

        let mut total = 0;
        for page in 0..last_page {
            let current_url = page_url(url, page);
            let envelope = self.client.fetch_response(&current_url).await?;
            self.tracker.record_internal(envelope.rate_limit);
            total += collection_items(&current_url, envelope.data)?.len();
        }

        debug!(total, pages = last_page, "count complete");
        Ok(total)
    }

    /// Maps every record of a collection into a [`Downloadable`].
    ///
    /// `repository` (`owner/name`) is stamped onto each descriptor; the
    /// record's `id`, `name`, and `zipball_url` fields are copied when
    /// present and of the right JSON type, `None` otherwise. Descriptor
    /// order is the paginator's page-then-item order.
    ///
    /// # Errors
    ///
    /// Same as [`Scraper::paginate`].
    #[instrument(skip(self), fields(repository = %repository, url = %url))]
    pub async fn list_downloadables(
        &mut self,
        repository: &str,
        url: &str,
    ) -> Result<Vec<Downloadable>, ScrapeError> {
        let records = self.paginate(url).await?;
        let descriptors: Vec<Downloadable> = records
            .iter()
            .map(|record| map_downloadable(repository, record))
            .collect();
        debug!(descriptors = descriptors.len(), "mapped downloadables");
        Ok(descriptors)
    }

    /// Returns the snapshot recorded by pagination-driving requests.
    #[must_use]
    pub fn internal_rate_limit(&self) -> RateLimitSnapshot {
        self.tracker.internal()
    }

    /// Returns the snapshot recorded by caller-facing requests.
    #[must_use]
    pub fn external_rate_limit(&self) -> RateLimitSnapshot {
        self.tracker.external()
    }
}

/// Builds the URL for one page of a collection.
fn page_url(base: &str, page: u32) -> String {
    format!("{base}?per_page={PER_PAGE}&page={page}")
}

/// Unwraps a page payload into its items, or classifies the failure.
///
/// GitHub reports API-level problems as an object with a `message` field
/// (`{"message": "Not Found"}`); that becomes [`ScrapeError::Api`] so a
/// missing repository can never masquerade as an empty collection. Any other
/// non-array payload is [`ScrapeError::UnexpectedPayload`].
fn collection_items(url: &str, data: Value) -> Result<Vec<Value>, ScrapeError> {
    match data {
        Value::Array(items) => Ok(items),
        other => match other.get("message").and_then(Value::as_str) {
            Some(message) => Err(ScrapeError::api(url, message)),
            None => Err(ScrapeError::unexpected_payload(url)),
        },
    }
}

fn map_downloadable(repository: &str, record: &Value) -> Downloadable {
    Downloadable {
        repository: repository.to_string(),
        id: record.get("id").and_then(Value::as_u64),
        name: record
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        url: record
            .get("zipball_url")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}
