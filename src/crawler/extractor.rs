//! On-page SEO signal extraction
//!
//! Pulls the audit fields out of a parsed HTML document. Extraction is
//! best effort and never fails: a page missing a tag simply yields an
//! empty field, and malformed HTML goes through the parser's error
//! recovery like a browser would.

use scraper::{ElementRef, Html, Selector};

/// Elements whose text is not visible page copy. Matches what a reader
/// actually sees: chrome (nav/header/footer), embedded code, and frames
/// are all excluded from the word count.
const INVISIBLE_ELEMENTS: [&str; 8] = [
    "script", "style", "noscript", "nav", "header", "footer", "iframe", "template",
];

/// How many H2 headings a record keeps
const MAX_H2S: usize = 3;

/// SEO fields extracted from one document
#[derive(Debug, Clone, Default)]
pub struct PageExtract {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub h2s: Vec<String>,
    pub canonical: String,
    pub meta_robots: String,
    pub word_count: usize,
    pub image_count: usize,
    pub images_with_alt: usize,
}

/// Extracts all audit fields from a parsed document
pub fn extract_metadata(document: &Html) -> PageExtract {
    let mut extract = PageExtract::default();

    if let Ok(selector) = Selector::parse("title") {
        if let Some(element) = document.select(&selector).next() {
            extract.title = squeeze_whitespace(&element.text().collect::<String>());
        }
    }

    extract.meta_description = meta_content(document, "description")
        .or_else(|| meta_property_content(document, "og:description"))
        .unwrap_or_default();
    extract.meta_robots = meta_content(document, "robots").unwrap_or_default();

    if let Ok(selector) = Selector::parse("h1") {
        if let Some(element) = document.select(&selector).next() {
            extract.h1 = squeeze_whitespace(&element.text().collect::<String>());
        }
    }

    // The first three h2s are kept as-is, empty ones included, so the
    // joined column reflects the page's actual heading order.
    if let Ok(selector) = Selector::parse("h2") {
        extract.h2s = document
            .select(&selector)
            .take(MAX_H2S)
            .map(|element| squeeze_whitespace(&element.text().collect::<String>()))
            .collect();
    }

    // rel is matched case-insensitively by hand: rel="Canonical" is
    // valid HTML and common enough in the wild.
    if let Ok(selector) = Selector::parse("link[href]") {
        for element in document.select(&selector) {
            let is_canonical = element
                .value()
                .attr("rel")
                .map(|rel| rel.trim().eq_ignore_ascii_case("canonical"))
                .unwrap_or(false);
            if is_canonical {
                if let Some(href) = element.value().attr("href") {
                    extract.canonical = href.trim().to_string();
                    break;
                }
            }
        }
    }

    extract.word_count = count_visible_words(document);

    if let Ok(selector) = Selector::parse("img") {
        for element in document.select(&selector) {
            extract.image_count += 1;
            let has_alt = element
                .value()
                .attr("alt")
                .map(|alt| !alt.trim().is_empty())
                .unwrap_or(false);
            if has_alt {
                extract.images_with_alt += 1;
            }
        }
    }

    extract
}

/// Finds a `<meta name="...">` content value, matching the name
/// case-insensitively
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[content]").ok()?;
    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .map(|n| n.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| squeeze_whitespace(content))
        .filter(|content| !content.is_empty())
}

/// Finds a `<meta property="...">` content value (Open Graph style)
fn meta_property_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse("meta[content]").ok()?;
    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("property")
                .map(|p| p.trim().eq_ignore_ascii_case(property))
                .unwrap_or(false)
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| squeeze_whitespace(content))
        .filter(|content| !content.is_empty())
}

/// Counts words in the document's visible text
///
/// A word is a whitespace-delimited token containing at least one
/// alphanumeric character, so lone punctuation and separators do not
/// inflate the count.
fn count_visible_words(document: &Html) -> usize {
    let mut text = String::new();
    collect_visible_text(document.root_element(), &mut text);
    text.split_whitespace()
        .filter(|token| token.chars().any(|c| c.is_alphanumeric()))
        .count()
}

/// Walks the element tree accumulating text nodes, skipping invisible
/// subtrees entirely. Comments and doctype nodes fall through untouched.
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    if INVISIBLE_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_visible_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

/// Collapses runs of whitespace (including newlines) into single spaces
fn squeeze_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
