//! Output sinks and run summary
//!
//! Thin consumers of the record stream: a streaming CSV writer, a
//! collect-then-write JSON writer, and the end-of-run counters.

mod csv;
mod json;
mod stats;

pub use self::csv::CsvSink;
pub use self::json::JsonSink;
pub use stats::{print_stats, CrawlStats};
