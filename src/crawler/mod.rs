//! Crawl engine
//!
//! The engine is four collaborators around one shared context: the
//! frontier (what to visit), the fetcher (how to get it), the extractor
//! and link collector (what it said), and the coordinator tying them to
//! a worker pool.

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::{CancelHandle, Coordinator, CrawlRun, HostDelays, RunOutcome, RunStatus};
pub use extractor::{extract_metadata, PageExtract};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::{CrawlTarget, Frontier};
pub use links::{collect_links, LinkSummary};
