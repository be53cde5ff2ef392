//! GitHub API access: request execution, link-header pagination, rate-limit
//! bookkeeping, and collection enumeration.
//!
//! The module splits along the request lifecycle: [`ApiClient`] executes
//! single authenticated requests and packages them as envelopes,
//! [`parse_link_header`] reads the `Link` header those envelopes carry,
//! [`RateLimitTracker`] keeps the two rate-limit snapshots, and [`Scraper`]
//! drives whole-collection walks on top of the three.
//!
//! # Example
//!
//! ```no_run
//! use tagscraper_core::github::Scraper;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scraper = Scraper::new("ghp_token");
//! let total = scraper
//!     .get_total("https://api.github.com/repos/octo/demo/tags")
//!     .await?;
//! println!("{total} tags");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod link;
mod rate_limit;
mod scraper;

pub use client::{ApiClient, DEFAULT_API_ROOT, RequestEnvelope};
pub use error::ScrapeError;
pub use link::{PaginationLink, extract_page_from_url, parse_link_header};
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};
pub use scraper::{Downloadable, PER_PAGE, Scraper};
