//! Per-page audit record
//!
//! One [`PageRecord`] is emitted for every URL the crawler visits, whether
//! the fetch succeeded, returned a non-2xx status, or failed outright. The
//! schema is fixed so downstream sinks (CSV, JSON) never have to branch on
//! outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Column order for the CSV sink. This order is part of the output
/// contract and must not change between runs.
pub const CSV_HEADERS: [&str; 13] = [
    "URL",
    "Status_Code",
    "Title",
    "Meta_Description",
    "H1",
    "H2s",
    "Canonical",
    "Meta_Robots",
    "Word_Count",
    "Internal_Links",
    "External_Links",
    "Image_Count",
    "Images_With_Alt_Count",
];

/// SEO signals extracted from (or recorded about) a single page
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    /// Normalized URL as it was dequeued from the frontier
    pub url: String,
    /// URL actually reached after redirects
    pub final_url: String,
    /// HTTP status code; 0 marks a failed fetch (see `error`)
    pub status_code: u16,
    /// Link distance from the seed (seed itself is 0)
    pub depth: u32,
    /// `<title>` text, trimmed and whitespace-squeezed
    pub title: String,
    /// `<meta name="description">`, falling back to og:description
    pub meta_description: String,
    /// First `<h1>` text
    pub h1: String,
    /// Up to the first three `<h2>` texts
    pub h2s: Vec<String>,
    /// `<link rel="canonical">` href
    pub canonical: String,
    /// `<meta name="robots">` content
    pub meta_robots: String,
    /// Visible-text word count
    pub word_count: usize,
    /// Count of same-host links on the page
    pub internal_links: usize,
    /// Count of off-host links on the page
    pub external_links: usize,
    /// Total `<img>` elements
    pub image_count: usize,
    /// `<img>` elements with a non-empty alt attribute
    pub images_with_alt: usize,
    /// When the fetch completed (or failed)
    pub fetched_at: DateTime<Utc>,
    /// Human-readable cause for a failed fetch; None for any HTTP response
    pub error: Option<String>,
}

impl PageRecord {
    /// Creates an empty record shell for a URL at a given depth
    ///
    /// Extraction fields start empty; the caller fills in whatever the
    /// fetch outcome provides.
    pub fn new(url: String, depth: u32) -> Self {
        Self {
            final_url: url.clone(),
            url,
            status_code: 0,
            depth,
            title: String::new(),
            meta_description: String::new(),
            h1: String::new(),
            h2s: Vec::new(),
            canonical: String::new(),
            meta_robots: String::new(),
            word_count: 0,
            internal_links: 0,
            external_links: 0,
            image_count: 0,
            images_with_alt: 0,
            fetched_at: Utc::now(),
            error: None,
        }
    }

    /// Creates an error-marker record for a fetch that produced no response
    ///
    /// Status code 0 distinguishes these from real HTTP statuses; the
    /// message says why (timeout, TLS failure, redirect loop, ...).
    pub fn from_error(url: String, depth: u32, message: String) -> Self {
        let mut record = Self::new(url, depth);
        record.error = Some(message);
        record
    }

    /// Renders the H2 headings as a single cell value
    pub fn h2s_joined(&self) -> String {
        self.h2s.join(" | ")
    }

    /// Produces the CSV row for this record, matching [`CSV_HEADERS`]
    pub fn csv_row(&self) -> [String; 13] {
        [
            self.url.clone(),
            self.status_code.to_string(),
            self.title.clone(),
            self.meta_description.clone(),
            self.h1.clone(),
            self.h2s_joined(),
            self.canonical.clone(),
            self.meta_robots.clone(),
            self.word_count.to_string(),
            self.internal_links.to_string(),
            self.external_links.to_string(),
            self.image_count.to_string(),
            self.images_with_alt.to_string(),
        ]
    }
}
