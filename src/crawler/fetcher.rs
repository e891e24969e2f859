//! HTTP fetcher implementation
//!
//! Builds the run's shared HTTP client and performs single bounded GET
//! requests. A non-2xx status is not an error here: the page responded,
//! and the status becomes part of its audit record. Errors are reserved
//! for fetches that produced no response at all.

use crate::config::CrawlConfig;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use url::Url;

/// Maximum redirect hops before the fetch is abandoned
const MAX_REDIRECTS: usize = 5;

/// A completed HTTP exchange, success or not
#[derive(Debug)]
pub struct FetchedPage {
    /// URL actually reached after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body (may be empty for non-HTML or error pages)
    pub body: String,
}

/// Builds the HTTP client shared by every request in a run
///
/// The client carries the configured user agent, whole-request timeout,
/// and redirect cap. TLS verification is disabled only when the config
/// says so, for auditing staging hosts with self-signed certificates.
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single page
///
/// # Arguments
///
/// * `client` - The run's shared HTTP client
/// * `url` - Normalized URL to fetch
///
/// # Returns
///
/// * `Ok(FetchedPage)` - The server responded (any status code)
/// * `Err(CrawlError)` - Timeout, redirect cap, TLS failure, or other
///   network error; classified for the record's error marker
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, CrawlError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status().as_u16();
    let final_url = response.url().clone();

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        final_url,
        status,
        body,
    })
}

/// Maps a reqwest error to the crawl error taxonomy
fn classify_error(url: &Url, e: reqwest::Error) -> CrawlError {
    if e.is_timeout() {
        return CrawlError::Timeout {
            url: url.to_string(),
        };
    }

    if e.is_redirect() {
        let last = e
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| url.to_string());
        return CrawlError::RedirectLimit {
            url: url.to_string(),
            last,
        };
    }

    if is_tls_error(&e) {
        return CrawlError::Tls {
            url: url.to_string(),
            message: e.to_string(),
        };
    }

    CrawlError::Network {
        url: url.to_string(),
        source: e,
    }
}

/// Detects certificate and TLS handshake failures
///
/// reqwest does not expose a TLS predicate, so this walks the error chain
/// looking for the rustls/native-tls vocabulary.
fn is_tls_error(e: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = source {
        let text = err.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = err.source();
    }
    false
}
