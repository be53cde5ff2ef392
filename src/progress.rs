//! Progress UI (bar) for download runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tagscraper_core::PipelineStats;

/// Spawns the progress UI (bar) when requested.
/// Returns (handle, stop) so the caller can signal stop and await the handle.
/// When `use_bar` is false, returns (None, stop) with stop already true.
pub(crate) fn spawn_progress_ui(
    use_bar: bool,
    stats: Arc<PipelineStats>,
    total: usize,
) -> (Option<tokio::task::JoinHandle<()>>, Arc<AtomicBool>) {
    if !use_bar {
        return (None, Arc::new(AtomicBool::new(true)));
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handle = spawn_bar_inner(stats, total, Arc::clone(&stop));
    (Some(handle), stop)
}

fn spawn_bar_inner(
    stats: Arc<PipelineStats>,
    total: usize,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        while !stop.load(Ordering::SeqCst) {
            bar.set_position(stats.handled().min(total) as u64);
            bar.set_message(format!(
                "{} new, {} skipped, {} failed",
                stats.downloaded(),
                stats.skipped(),
                stats.failed()
            ));
            tokio::time::sleep(Duration::from_millis(120)).await;
        }

        bar.set_position(stats.handled().min(total) as u64);
        bar.finish_and_clear();
    })
}
