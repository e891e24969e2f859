//! Link discovery
//!
//! Resolves every `<a href>` on a page against the document's final URL
//! and splits the results into internal (same host as the seed) and
//! external. Only internal links feed back into the frontier; external
//! links are just counted.

use crate::url::{is_internal, resolve_href};
use scraper::{Html, Selector};
use url::Url;

/// Links found on one page
#[derive(Debug, Default)]
pub struct LinkSummary {
    /// Normalized same-host URLs, candidates for the frontier
    pub internal: Vec<Url>,
    /// Count of same-host links (including frontier duplicates)
    pub internal_count: usize,
    /// Count of off-host http(s) links
    pub external_count: usize,
}

/// Collects and classifies the links on a page
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `base` - The page's final URL, used to resolve relative hrefs
/// * `seed_host` - Lowercase host of the crawl seed
///
/// Hrefs that are empty, fragment-only, non-http(s) (`mailto:`,
/// `javascript:`, `tel:`, `data:`), or unparseable count in neither
/// bucket.
pub fn collect_links(document: &Html, base: &Url, seed_host: &str) -> LinkSummary {
    let mut summary = LinkSummary::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return summary;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        // resolve_href rejects non-http(s) schemes
        let Ok(url) = resolve_href(base, href) else {
            continue;
        };

        if is_internal(&url, seed_host) {
            summary.internal_count += 1;
            summary.internal.push(url);
        } else {
            summary.external_count += 1;
        }
    }

    summary
}
