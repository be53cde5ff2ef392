//! Tagscraper Core Library
//!
//! This library enumerates the tags or releases of a GitHub repository
//! across every page of the paginated API and bulk-downloads the zipball
//! archive behind each one.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`github`] - Authenticated API access, pagination, rate-limit tracking
//! - [`download`] - Streaming archive downloads and the bulk pipeline
//! - [`user_agent`] - Request identity strings for both HTTP clients
//!
//! Enumeration and download are deliberately independent: the scraper
//! produces plain [`Downloadable`] descriptors, and the pipeline consumes
//! them without knowing where they came from.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod github;
pub mod user_agent;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use download::{
    ArchiveClient, DownloadError, DownloadPipeline, PipelineReport, PipelineStats,
    ReleaseInformation, archive_dir_name,
};
pub use github::{
    ApiClient, DEFAULT_API_ROOT, Downloadable, PER_PAGE, PaginationLink, RateLimitSnapshot,
    RateLimitTracker, RequestEnvelope, ScrapeError, Scraper, parse_link_header,
};
