use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL according to seoscope's normalization rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Validate scheme: only http and https are accepted
/// 3. Lowercase the host (the url crate does this on parse)
/// 4. Drop the default port for the scheme (also done on parse)
/// 5. Remove the fragment (everything after #)
/// 6. Remove a trailing slash from the path, except for the root /
///
/// Query strings are preserved verbatim: two URLs that differ only in
/// their query are different pages and must not collapse into one
/// visited entry.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use seoscope::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/page/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize(url)
}

/// Resolves an href against a base URL and normalizes the result
///
/// Relative references (`/about`, `../pricing`, `page.html`) resolve the
/// way a browser would; absolute hrefs pass through. The resolved URL goes
/// through the same normalization as [`normalize_url`], so a link to
/// `/about/` and a link to `/about` land on the same frontier entry.
///
/// # Arguments
///
/// * `base` - The URL of the document containing the href
/// * `href` - The raw href attribute value
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    let url = base.join(href).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize(url)
}

/// Applies the shared normalization steps to an already-parsed URL
fn normalize(mut url: Url) -> UrlResult<Url> {
    // Scheme check: anything that is not a web page is rejected here, so
    // callers never have to think about mailto:/ftp:/data: URLs.
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "only http and https are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    // Trailing slash: /page/ and /page are the same document. The root
    // path stays as "/" because Url cannot represent an empty path.
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}
