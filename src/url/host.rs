use url::Url;

/// Extracts the host from a URL
///
/// Returns the host portion lowercased. Valid http(s) URLs always carry a
/// host, but the signature stays `Option` so callers handle the url crate's
/// contract directly.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seoscope::url::extract_host;
///
/// let url = Url::parse("https://Blog.Example.COM/post").unwrap();
/// assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL belongs to the crawl's seed host
///
/// Internal means an exact host match; subdomains are a different host and
/// therefore external.
pub fn is_internal(url: &Url, seed_host: &str) -> bool {
    match extract_host(url) {
        Some(host) => host == seed_host,
        None => false,
    }
}
