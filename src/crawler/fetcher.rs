//! HTTP page fetcher
//!
//! Issues a single bounded GET per frontier entry with a browser-like header
//! set and classifies the outcome. Fetching is deliberately simple:
//! - No automatic retries (politeness over completeness)
//! - A hard 30 second timeout per request
//! - Non-HTML responses are skipped, never treated as errors

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Result of one fetch attempt
///
/// Never retried within a job; a failed URL is skipped and the frontier
/// loop continues.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Ok {
        /// Page body
        html: String,
        /// HTTP status code
        status: u16,
    },

    /// Response was not HTML; skipped silently, not an error
    SkippedNonHtml,

    /// Fetch failed (non-2xx status, network error, timeout)
    Failed(String),
}

/// Builds the HTTP client shared by all fetches of one job
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// - Non-2xx status → `Failed("http-status:<code>")`
/// - Content-Type other than `text/html`/`application/xhtml` → `SkippedNonHtml`
/// - Network or timeout error → `Failed(reason)`
pub async fn fetch_page(client: &Client, url: &Url) -> FetchOutcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("Request to {url} failed: {e}");
            return FetchOutcome::Failed(e.to_string());
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failed(format!("http-status:{}", status.as_u16()));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        debug!("Skipping non-HTML response from {url}: {content_type}");
        return FetchOutcome::SkippedNonHtml;
    }

    match response.text().await {
        Ok(html) => FetchOutcome::Ok {
            html,
            status: status.as_u16(),
        },
        Err(e) => FetchOutcome::Failed(e.to_string()),
    }
}
