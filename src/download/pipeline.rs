//! Sequential bulk download of archive collections.
//!
//! The pipeline walks a list of download descriptors one by one, placing
//! each archive under a per-repository directory and skipping files that
//! already exist. One bad descriptor or one failed transfer never aborts
//! the run: failures are recorded per item and reported at the end.
//!
//! Downloads are strictly sequential. Archives are large, the item counts
//! are modest, and a re-run resumes free of charge thanks to the
//! skip-if-present check, so fan-out would buy little and cost ordering.
//!
//! # Example
//!
//! ```no_run
//! use tagscraper_core::download::DownloadPipeline;
//! use tagscraper_core::github::Downloadable;
//! use std::path::Path;
//!
//! # async fn example() {
//! let pipeline = DownloadPipeline::new();
//! let items: Vec<Downloadable> = Vec::new();
//! let report = pipeline.download_all(Path::new("./downloads"), &items).await;
//! println!("{} downloaded, {} skipped", report.downloaded.len(), report.skipped.len());
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, instrument, warn};

use super::client::ArchiveClient;
use super::error::DownloadError;
use crate::github::Downloadable;

/// Returns the directory name for a repository's archives.
///
/// Every `/` becomes `-`, so `owner/name` maps to `owner-name` and the
/// result is always a single path component.
#[must_use]
pub fn archive_dir_name(repository: &str) -> String {
    repository.replace('/', "-")
}

/// Live counters for one pipeline run.
///
/// Counters restart from zero at the start of every
/// [`DownloadPipeline::download_all`] call. Uses atomic counters so a
/// progress reporter on another task can poll while the pipeline runs.
#[derive(Debug, Default)]
pub struct PipelineStats {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl PipelineStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of archives fetched in this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    /// Returns the number of archives skipped because the file existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of items handled so far.
    #[must_use]
    pub fn handled(&self) -> usize {
        self.downloaded() + self.skipped() + self.failed()
    }

    fn reset(&self) {
        self.downloaded.store(0, Ordering::SeqCst);
        self.skipped.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
    }

    fn increment_downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Paths of archives fetched in this run.
    pub downloaded: Vec<PathBuf>,
    /// Paths that already existed and were left untouched.
    pub skipped: Vec<PathBuf>,
    /// Descriptors that failed, with the per-item error.
    pub failures: Vec<(Downloadable, DownloadError)>,
}

impl PipelineReport {
    /// True when every item of a non-empty run failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.failures.is_empty() && self.downloaded.is_empty() && self.skipped.is_empty()
    }
}

/// Downloads a collection of archives one by one.
#[derive(Debug, Clone)]
pub struct DownloadPipeline {
    client: ArchiveClient,
    stats: Arc<PipelineStats>,
}

impl Default for DownloadPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadPipeline {
    /// Creates a pipeline with a default [`ArchiveClient`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(ArchiveClient::new())
    }

    /// Creates a pipeline around an already-configured client.
    #[must_use]
    pub fn with_client(client: ArchiveClient) -> Self {
        Self {
            client,
            stats: Arc::new(PipelineStats::new()),
        }
    }

    /// Returns a handle to the live counters for progress reporting.
    #[must_use]
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Downloads every descriptor under `destination`, sequentially.
    ///
    /// Each archive lands at
    /// `destination/{archive_dir_name(repository)}/{name}.zip`; the
    /// directory is created as needed. An item whose `.zip` already exists
    /// is skipped without any request, which makes interrupted runs
    /// resumable by re-running them. An empty list is a no-op.
    ///
    /// Failures never abort the run; they are collected into the report.
    #[instrument(skip(self, items), fields(items = items.len(), destination = %destination.display()))]
    pub async fn download_all(&self, destination: &Path, items: &[Downloadable]) -> PipelineReport {
        self.stats.reset();
        let mut report = PipelineReport::default();

        for item in items {
            match self.download_one(destination, item).await {
                Ok(Outcome::Downloaded(path)) => {
                    self.stats.increment_downloaded();
                    debug!(path = %path.display(), "archive downloaded");
                    report.downloaded.push(path);
                }
                Ok(Outcome::Skipped(path)) => {
                    self.stats.increment_skipped();
                    debug!(path = %path.display(), "archive already present, skipping");
                    report.skipped.push(path);
                }
                Err(error) => {
                    self.stats.increment_failed();
                    warn!(
                        repository = %item.repository,
                        name = item.name.as_deref().unwrap_or("<unnamed>"),
                        %error,
                        "archive download failed"
                    );
                    report.failures.push((item.clone(), error));
                }
            }
        }

        info!(
            downloaded = report.downloaded.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "download run complete"
        );
        report
    }

    async fn download_one(
        &self,
        destination: &Path,
        item: &Downloadable,
    ) -> Result<Outcome, DownloadError> {
        let Some(name) = item.name.as_deref() else {
            return Err(DownloadError::incomplete_descriptor(
                &item.repository,
                item.id,
                "name",
            ));
        };
        let Some(url) = item.url.as_deref() else {
            return Err(DownloadError::incomplete_descriptor(
                &item.repository,
                item.id,
                "zipball URL",
            ));
        };

        let dir = destination.join(archive_dir_name(&item.repository));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DownloadError::io(dir.clone(), e))?;

        let target = dir.join(format!("{name}.zip"));
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Ok(Outcome::Skipped(target));
        }

        self.client.download_to_path(url, &target).await?;
        Ok(Outcome::Downloaded(target))
    }
}

enum Outcome {
    Downloaded(PathBuf),
    Skipped(PathBuf),
}
