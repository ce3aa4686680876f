//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! HTTP/HTTPS URLs, local files, and standard input, plus the
//! [`PageFetcher`] seam the request service fetches through.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::{PagegradeError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Pagegrade/1.0)".to_string() }
    }
}

/// Validates that `url` is an absolute http(s) URL.
pub fn parse_page_url(url: &str) -> Result<Url> {
    let parsed_url = Url::parse(url.trim()).map_err(|e| PagegradeError::InvalidUrl(e.to_string()))?;

    match parsed_url.scheme() {
        "http" | "https" => Ok(parsed_url),
        other => Err(PagegradeError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http:// or https://",
            other
        ))),
    }
}

/// Fetches HTML content from a URL.
///
/// Follows redirects and respects the configured timeout. Any non-2xx status
/// is reported as [`PagegradeError::Fetch`].
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_page_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(PagegradeError::HttpError)?;

    fetch_with_client(&client, parsed_url, config).await
}

async fn fetch_with_client(client: &Client, url: Url, config: &FetchConfig) -> Result<String> {
    let response = client
        .get(url.clone())
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "de-DE,de;q=0.9,en;q=0.8")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                PagegradeError::Timeout { timeout: config.timeout }
            } else {
                PagegradeError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PagegradeError::Fetch { status: status.as_u16(), url: url.to_string() });
    }

    let content_type = response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    check_content_type(content_type, &url)?;

    let content = response.text().await?;
    debug!(url = %url, bytes = content.len(), "page fetched");

    Ok(content)
}

/// Accepts HTML and XHTML responses, and responses that declare no type.
fn check_content_type(content_type: Option<&str>, url: &Url) -> Result<()> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match mime.as_str() {
        "" | "text/html" | "application/xhtml+xml" => Ok(()),
        _ => Err(PagegradeError::UnsupportedContentType {
            content_type: content_type.to_string(),
            url: url.to_string(),
        }),
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PagegradeError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PagegradeError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(PagegradeError::from)?;

    Ok(buffer)
}

/// Retrieves the raw HTML of a single page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] over HTTP, reusing one client across requests.
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(PagegradeError::HttpError)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed_url = parse_page_url(url)?;
        fetch_with_client(&self.client, parsed_url, &self.config).await
    }
}
