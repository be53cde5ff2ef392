//! Archive download: streaming HTTP client and the sequential bulk pipeline.
//!
//! This module fetches the zipball archives the enumeration side describes:
//! [`ArchiveClient`] streams a single archive to disk (or probes its
//! advertised filename and size), and [`DownloadPipeline`] walks a whole
//! descriptor list with per-item failure isolation and skip-if-present
//! idempotence.
//!
//! # Example
//!
//! ```no_run
//! use tagscraper_core::download::DownloadPipeline;
//! use tagscraper_core::github::Downloadable;
//! use std::path::Path;
//!
//! # async fn example() {
//! let items = vec![Downloadable {
//!     repository: "octo/demo".to_string(),
//!     id: None,
//!     name: Some("v1.2.0".to_string()),
//!     url: Some("https://api.github.com/repos/octo/demo/zipball/v1.2.0".to_string()),
//! }];
//! let pipeline = DownloadPipeline::new();
//! let report = pipeline.download_all(Path::new("./downloads"), &items).await;
//! println!("{} downloaded", report.downloaded.len());
//! # }
//! ```

mod client;
mod error;
mod filename;
mod pipeline;

pub use client::{ArchiveClient, ReleaseInformation};
pub use error::DownloadError;
pub use pipeline::{DownloadPipeline, PipelineReport, PipelineStats, archive_dir_name};
