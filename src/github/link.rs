//! Pagination `Link` header parsing.
//!
//! GitHub collection endpoints advertise neighboring pages through a `Link`
//! response header of comma-separated `<url>; rel="name"` entries, e.g.:
//!
//! ```text
//! <https://api.github.com/repositories/1/tags?per_page=100&page=2>; rel="next",
//! <https://api.github.com/repositories/1/tags?per_page=100&page=3>; rel="last"
//! ```
//!
//! [`parse_link_header`] turns that header into a map from relation name to
//! [`PaginationLink`], with the page number pre-extracted from each URL so the
//! paginator can read the `last` bound without re-parsing URLs.

use std::collections::HashMap;

/// One relation entry from a parsed `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationLink {
    /// The target URL, with the surrounding angle brackets stripped.
    pub url: String,
    /// The `page` query parameter of that URL, when present and numeric.
    pub page: Option<u32>,
}

/// Parses a raw `Link` header value into a relation → link map.
///
/// `None` input means the server sent no header (a single-page collection).
/// A present header always yields `Some`, even when no entry could be parsed
/// out of it. Callers treat an empty map the same as `None` when looking up
/// a relation, so "header present but useless" degrades to single-page
/// behavior instead of failing.
///
/// Entries are tolerated in arbitrary order; an entry without a `rel`
/// parameter or without a `<url>` part is skipped.
#[must_use]
pub fn parse_link_header(header: Option<&str>) -> Option<HashMap<String, PaginationLink>> {
    let header = header?;
    let mut links = HashMap::new();

    for entry in header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in entry.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel) {
            links.insert(
                rel.to_string(),
                PaginationLink {
                    url: url.to_string(),
                    page: extract_page_from_url(url),
                },
            );
        }
    }

    Some(links)
}

/// Extracts the `page` query parameter from a URL as an integer.
///
/// Returns `None` when the URL has no query string, no `page` parameter, or
/// a non-numeric value.
#[must_use]
pub fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    for param in query.split('&') {
        if let Some(value) = param.strip_prefix("page=") {
            return value.parse().ok();
        }
    }

    None
}
