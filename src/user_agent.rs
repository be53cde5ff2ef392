//! Shared User-Agent strings for API and archive HTTP clients.
//!
//! Single source for project URL and UA format so API and archive traffic
//! stay consistent and easy to update (good citizenship; RFC 9308). GitHub
//! rejects requests without a User-Agent header, so both clients always
//! identify the tool.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/tagscraper";

/// Default User-Agent for GitHub API requests.
#[must_use]
pub fn api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tagscraper/{version} (release-archiver; +{PROJECT_UA_URL})")
}

/// Default User-Agent for archive download requests.
#[must_use]
pub fn archive_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tagscraper/{version} (archive-fetch; +{PROJECT_UA_URL})")
}
