//! HTTP client for fetching archive files.
//!
//! Archive requests differ from API requests in every way that matters
//! here: they go to redirect targets outside the API host, so no API token
//! is ever attached; they carry a distinct User-Agent; and they stream
//! multi-megabyte bodies to disk under a much longer read timeout instead
//! of buffering JSON.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::filename::parse_content_disposition;
use crate::user_agent;

/// Connect timeout for archive requests, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout for archive requests, in seconds. Zipballs can be large.
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Filename and size the server advertises for one archive.
///
/// Both fields are `None` when the corresponding header is absent; codeload
/// responses frequently omit Content-Length for streamed zipballs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInformation {
    /// Name from the Content-Disposition header, when one was sent.
    pub filename: Option<String>,
    /// Size in bytes from Content-Length, when the server knows it.
    pub size: Option<u64>,
}

/// HTTP client for streaming archives to disk.
///
/// Created once and reused across a whole download run, taking advantage of
/// connection pooling.
///
/// # Example
///
/// ```no_run
/// use tagscraper_core::download::ArchiveClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ArchiveClient::new();
/// let bytes = client
///     .download_to_path(
///         "https://api.github.com/repos/octo/demo/zipball/v1.2.0",
///         Path::new("./downloads/octo-demo/v1.2.0.zip"),
///     )
///     .await?;
/// println!("wrote {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveClient {
    /// Creates a new archive client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new archive client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::archive_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads one archive to the given path, returning bytes written.
    ///
    /// The path's parent directory must already exist. On any failure after
    /// the file was created, the partial file is removed; an HTTP error
    /// status never creates the file at all, so a present `.zip` always
    /// means a completed download.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] for an unparseable URL,
    /// [`DownloadError::Network`] / [`DownloadError::Timeout`] for transport
    /// failures, [`DownloadError::HttpStatus`] for 4xx/5xx responses, and
    /// [`DownloadError::Io`] when writing fails.
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self.send_request(url).await?;

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let stream_result = stream_to_file(&mut file, response, url, path).await;
        if stream_result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        let bytes_written = stream_result?;

        info!(path = %path.display(), bytes = bytes_written, "archive download complete");
        Ok(bytes_written)
    }

    /// Reads the filename and size the server advertises for an archive.
    ///
    /// Issues a GET and inspects only the response headers; the body is
    /// dropped unread, so the transfer is cancelled after the header block.
    ///
    /// # Errors
    ///
    /// Same transport and status errors as
    /// [`download_to_path`](Self::download_to_path).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_release_information(
        &self,
        url: &str,
    ) -> Result<ReleaseInformation, DownloadError> {
        let response = self.send_request(url).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition);
        let size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        debug!(?filename, ?size, "release information");
        Ok(ReleaseInformation { filename, size })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        // Validate before sending so a malformed descriptor URL reports as
        // InvalidUrl rather than an opaque connection failure.
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        if !response.status().is_success() {
            return Err(DownloadError::http_status(url, response.status().as_u16()));
        }

        Ok(response)
    }
}

/// Streams the response body to a file, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path as url_path};
    use wiremock::{Match, Mock, Request, ResponseTemplate};

    /// Matches requests that carry no Authorization header and identify as
    /// the archive fetcher.
    struct UnauthenticatedArchiveUa;

    impl Match for UnauthenticatedArchiveUa {
        fn matches(&self, request: &Request) -> bool {
            let no_auth = request.headers.get("Authorization").is_none();
            let archive_ua = request
                .headers
                .get("User-Agent")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ua| ua.contains("archive-fetch"));
            no_auth && archive_ua
        }
    }

    #[tokio::test]
    async fn test_download_writes_body_to_path() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(url_path("/repos/octo/demo/zipball/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04zip bytes"))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/repos/octo/demo/zipball/v1", mock_server.uri());
        let target = temp_dir.path().join("v1.zip");

        let bytes = client.download_to_path(&url, &target).await.unwrap();

        assert_eq!(bytes, 13);
        assert_eq!(std::fs::read(&target).unwrap(), b"PK\x03\x04zip bytes");
    }

    #[tokio::test]
    async fn test_download_sends_no_token_and_archive_user_agent() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(url_path("/zipball/v1"))
            .and(UnauthenticatedArchiveUa)
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/zipball/v1", mock_server.uri());
        let target = temp_dir.path().join("v1.zip");

        client.download_to_path(&url, &target).await.unwrap();
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_download_http_error_creates_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(url_path("/zipball/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/zipball/gone", mock_server.uri());
        let target = temp_dir.path().join("gone.zip");

        let result = client.download_to_path(&url, &target).await;

        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
        assert!(
            !target.exists(),
            "an HTTP error must not leave a file behind"
        );
    }

    #[test]
    fn test_download_invalid_url() {
        // The URL check fires before any network use, so block_on suffices.
        let temp_dir = TempDir::new().unwrap();
        let client = ArchiveClient::new();

        let result = tokio_test::block_on(
            client.download_to_path("not-a-valid-url", &temp_dir.path().join("x.zip")),
        );

        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_download_timeout_leaves_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(url_path("/slow.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"data")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new_with_timeouts(30, 1);
        let url = format!("{}/slow.zip", mock_server.uri());
        let target = temp_dir.path().join("slow.zip");

        let result = client.download_to_path(&url, &target).await;

        assert!(result.is_err(), "expected timeout or network error");
        assert!(
            !target.exists(),
            "a timed-out download must not leave a file behind"
        );
    }

    #[tokio::test]
    async fn test_download_streams_large_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        let large_content = vec![0u8; 1024 * 1024];
        Mock::given(method("GET"))
            .and(url_path("/large.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(large_content))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/large.zip", mock_server.uri());
        let target = temp_dir.path().join("large.zip");

        let bytes = client.download_to_path(&url, &target).await.unwrap();

        assert_eq!(bytes, 1024 * 1024);
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 1024 * 1024);
    }

    // ==================== Release Information Tests ====================

    #[tokio::test]
    async fn test_fetch_release_information_reads_headers() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(url_path("/zipball/v2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Content-Disposition",
                        "attachment; filename=octo-demo-v2.zip",
                    )
                    .set_body_bytes(vec![0u8; 2048]),
            )
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/zipball/v2", mock_server.uri());
        let info = client.fetch_release_information(&url).await.unwrap();

        assert_eq!(info.filename.as_deref(), Some("octo-demo-v2.zip"));
        assert_eq!(info.size, Some(2048));
    }

    #[tokio::test]
    async fn test_fetch_release_information_absent_headers_yield_none() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        // Chunked responses carry neither header; both fields stay None
        // instead of the probe failing.
        Mock::given(method("GET"))
            .and(url_path("/zipball/v3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/zipball/v3", mock_server.uri());
        let info = client.fetch_release_information(&url).await.unwrap();

        assert_eq!(info.filename, None);
        // wiremock itself sets Content-Length for fixed bodies; an empty
        // body reports 0 rather than absent.
        assert!(info.size.is_none() || info.size == Some(0));
    }

    #[tokio::test]
    async fn test_fetch_release_information_http_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(url_path("/zipball/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new();
        let url = format!("{}/zipball/missing", mock_server.uri());
        let result = client.fetch_release_information(&url).await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 404, .. })
        ));
    }
}
