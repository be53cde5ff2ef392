//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tagscraper_core::DEFAULT_API_ROOT;

/// Which artifact collection of the repository to enumerate.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    /// Git tags (`/repos/{owner}/{name}/tags`).
    Tags,
    /// Releases (`/repos/{owner}/{name}/releases`).
    Releases,
}

impl Collection {
    /// API path segment for this collection.
    #[must_use]
    pub fn as_path_segment(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Releases => "releases",
        }
    }
}

/// Enumerate a repository's tags or releases and download their archives.
///
/// Tagscraper walks every page of the GitHub API collection, then fetches
/// the zipball behind each entry into a per-repository directory under the
/// output directory. Archives that already exist on disk are skipped, so
/// interrupted runs can simply be re-run.
#[derive(Parser, Debug)]
#[command(name = "tagscraper")]
#[command(author, version, about)]
pub struct Args {
    /// Repository to scrape, as owner/name
    pub repo: String,

    /// Collection to enumerate
    #[arg(long, value_enum, default_value = "tags")]
    pub collection: Collection,

    /// GitHub API token (falls back to the GITHUB_TOKEN environment variable)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Directory that receives the per-repository archive folders
    #[arg(short, long, default_value = "./downloads")]
    pub out: PathBuf,

    /// Base URL of the GitHub API
    #[arg(long, default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    /// List the collection without downloading anything
    #[arg(long)]
    pub list_only: bool,

    /// Print only the item count of the collection and exit
    #[arg(long, conflicts_with = "list_only")]
    pub probe: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
