//! Crawl summary statistics
//!
//! Lightweight counters accumulated as records stream past, printed as
//! an end-of-run summary. These are audit headlines (missing titles,
//! images without alt text), not a metrics system.

use crate::record::PageRecord;

/// Per-run audit counters
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Total records seen
    pub pages: usize,
    /// Records with a 2xx status
    pub ok: usize,
    /// Records with a non-2xx HTTP status
    pub non_success: usize,
    /// Records for fetches that produced no response
    pub errors: usize,
    /// 2xx pages with no title
    pub missing_title: usize,
    /// 2xx pages with no meta description
    pub missing_description: usize,
    /// 2xx pages with no h1
    pub missing_h1: usize,
    /// Images without alt text, across all 2xx pages
    pub images_missing_alt: usize,
    total_words: usize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the counters
    pub fn observe(&mut self, record: &PageRecord) {
        self.pages += 1;

        if record.error.is_some() {
            self.errors += 1;
            return;
        }

        if !(200..300).contains(&record.status_code) {
            self.non_success += 1;
            return;
        }

        self.ok += 1;
        self.total_words += record.word_count;
        if record.title.is_empty() {
            self.missing_title += 1;
        }
        if record.meta_description.is_empty() {
            self.missing_description += 1;
        }
        if record.h1.is_empty() {
            self.missing_h1 += 1;
        }
        self.images_missing_alt += record.image_count.saturating_sub(record.images_with_alt);
    }

    /// Average visible word count over 2xx pages
    pub fn avg_word_count(&self) -> f64 {
        if self.ok == 0 {
            0.0
        } else {
            self.total_words as f64 / self.ok as f64
        }
    }
}

/// Prints the summary to stderr, so it never interleaves with a record
/// sink writing to stdout
pub fn print_stats(stats: &CrawlStats) {
    eprintln!("=== Crawl Summary ===");
    eprintln!("  Pages visited:        {}", stats.pages);
    eprintln!("  OK (2xx):             {}", stats.ok);
    eprintln!("  Non-2xx responses:    {}", stats.non_success);
    eprintln!("  Fetch errors:         {}", stats.errors);
    eprintln!();
    eprintln!("  Missing title:        {}", stats.missing_title);
    eprintln!("  Missing description:  {}", stats.missing_description);
    eprintln!("  Missing h1:           {}", stats.missing_h1);
    eprintln!("  Images without alt:   {}", stats.images_missing_alt);
    eprintln!("  Avg word count:       {:.1}", stats.avg_word_count());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_record(title: &str, words: usize) -> PageRecord {
        let mut record = PageRecord::new("https://example.com/".to_string(), 0);
        record.status_code = 200;
        record.title = title.to_string();
        record.word_count = words;
        record
    }

    #[test]
    fn test_counts_by_outcome() {
        let mut stats = CrawlStats::new();
        stats.observe(&ok_record("Home", 100));

        let mut not_found = PageRecord::new("https://example.com/gone".to_string(), 1);
        not_found.status_code = 404;
        stats.observe(&not_found);

        stats.observe(&PageRecord::from_error(
            "https://example.com/x".to_string(),
            1,
            "timeout".to_string(),
        ));

        assert_eq!(stats.pages, 3);
        assert_eq!(stats.ok, 1);
        assert_eq!(stats.non_success, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_missing_fields_counted_on_success_only() {
        let mut stats = CrawlStats::new();
        stats.observe(&ok_record("", 10));

        // A 404 has empty fields by construction; it must not count
        let mut not_found = PageRecord::new("https://example.com/gone".to_string(), 1);
        not_found.status_code = 404;
        stats.observe(&not_found);

        assert_eq!(stats.missing_title, 1);
        assert_eq!(stats.missing_h1, 1);
    }

    #[test]
    fn test_avg_word_count() {
        let mut stats = CrawlStats::new();
        stats.observe(&ok_record("A", 100));
        stats.observe(&ok_record("B", 200));
        assert_eq!(stats.avg_word_count(), 150.0);
    }

    #[test]
    fn test_avg_word_count_empty() {
        let stats = CrawlStats::new();
        assert_eq!(stats.avg_word_count(), 0.0);
    }

    #[test]
    fn test_images_missing_alt() {
        let mut stats = CrawlStats::new();
        let mut record = ok_record("Home", 10);
        record.image_count = 5;
        record.images_with_alt = 2;
        stats.observe(&record);
        assert_eq!(stats.images_missing_alt, 3);
    }
}
