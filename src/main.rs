//! CLI entry point for the tagscraper tool.

use std::io::{self, IsTerminal};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tagscraper_core::{ApiClient, DownloadPipeline, RateLimitSnapshot, Scraper};
use tracing::{debug, info, warn};

mod cli;
mod progress;

use cli::Args;
use progress::spawn_progress_ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    // The token stays out of log output, so no ?args here.
    debug!(
        repo = %args.repo,
        collection = ?args.collection,
        out = %args.out.display(),
        api_root = %args.api_root,
        list_only = args.list_only,
        probe = args.probe,
        "CLI arguments parsed"
    );

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .context("no API token; pass --token or set the GITHUB_TOKEN environment variable")?;

    let collection = args.collection.as_path_segment();
    let collection_url = format!(
        "{}/repos/{}/{}",
        args.api_root.trim_end_matches('/'),
        args.repo,
        collection
    );

    let mut scraper = Scraper::with_client(ApiClient::new(token));

    if args.probe {
        let total = scraper.get_total(&collection_url).await?;
        println!("{total}");
        log_rate_limit(&scraper.internal_rate_limit());
        return Ok(());
    }

    info!(repo = %args.repo, collection, "enumerating collection");
    let items = scraper
        .list_downloadables(&args.repo, &collection_url)
        .await?;
    log_rate_limit(&scraper.internal_rate_limit());

    if items.is_empty() {
        info!(repo = %args.repo, collection, "collection is empty, nothing to do");
        return Ok(());
    }

    if args.list_only {
        for item in &items {
            println!(
                "{}\t{}",
                item.name.as_deref().unwrap_or("-"),
                item.url.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    info!(items = items.len(), out = %args.out.display(), "starting downloads");

    let pipeline = DownloadPipeline::new();
    let use_bar = !args.quiet && args.verbose == 0 && io::stderr().is_terminal();
    let (bar_handle, stop) = spawn_progress_ui(use_bar, pipeline.stats(), items.len());

    let report = pipeline.download_all(&args.out, &items).await;

    stop.store(true, Ordering::SeqCst);
    if let Some(handle) = bar_handle {
        let _ = handle.await;
    }

    for (item, error) in &report.failures {
        warn!(
            repository = %item.repository,
            name = item.name.as_deref().unwrap_or("<unnamed>"),
            %error,
            "download failed"
        );
    }

    info!(
        downloaded = report.downloaded.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "run complete"
    );

    if report.all_failed() {
        bail!("all {} downloads failed", report.failures.len());
    }

    Ok(())
}

fn log_rate_limit(snapshot: &RateLimitSnapshot) {
    info!(
        used = snapshot.used,
        remaining = snapshot.remaining,
        limit = snapshot.limit,
        "API rate limit"
    );
    if snapshot.is_exhausted() {
        warn!(
            reset = snapshot.reset,
            "API rate limit exhausted, further requests will fail until the window resets"
        );
    }
}
