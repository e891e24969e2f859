//! Crawl orchestration
//!
//! The coordinator turns a validated config into a running crawl: it
//! normalizes the seed, builds the shared run context, and spawns the
//! fetch workers. Records flow out through a bounded channel, so a slow
//! consumer applies backpressure to the whole pipeline rather than
//! buffering the site in memory.

use crate::config::CrawlConfig;
use crate::crawler::extractor::extract_metadata;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::links::collect_links;
use crate::record::PageRecord;
use crate::robots::RobotsPolicy;
use crate::url::{extract_host, normalize_url};
use crate::{CrawlError, Result, UrlError};
use scraper::Html;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Capacity of the record channel between workers and the consumer
const RECORD_CHANNEL_CAPACITY: usize = 64;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The frontier drained naturally
    Completed,
    /// The run was cancelled; records emitted before then are valid
    Aborted,
}

/// Final accounting for a finished run
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Number of records emitted
    pub pages_visited: usize,
}

/// Per-host send-slot ledger enforcing the politeness delay
///
/// `acquire` reserves the next available slot for a host and sleeps until
/// it arrives, so same-host requests stay `delay` apart no matter how
/// many workers hold targets for that host. Distinct hosts never wait on
/// each other.
pub struct HostDelays {
    next_slot: tokio::sync::Mutex<HashMap<String, Instant>>,
}

impl HostDelays {
    pub fn new() -> Self {
        Self {
            next_slot: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Waits until this host's next send slot, then claims the one after
    pub async fn acquire(&self, host: &str, delay: Duration) {
        if delay.is_zero() {
            return;
        }

        let ready = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let ready = match slots.get(host) {
                Some(slot) => (*slot).max(now),
                None => now,
            };
            slots.insert(host.to_string(), ready + delay);
            ready
        };

        let now = Instant::now();
        if ready > now {
            tokio::time::sleep(ready - now).await;
        }
    }
}

impl Default for HostDelays {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a worker needs, scoped to one run
struct CrawlContext {
    config: CrawlConfig,
    client: reqwest::Client,
    frontier: Frontier,
    robots: RobotsPolicy,
    delays: HostDelays,
    cancelled: AtomicBool,
    seed_host: String,
    pages_visited: AtomicUsize,
}

/// Handle for cancelling a run from outside (Ctrl-C, a timeout, a test)
///
/// Cancellation closes the frontier and lets in-flight fetches finish;
/// it never tears down mid-request.
#[derive(Clone)]
pub struct CancelHandle {
    ctx: Arc<CrawlContext>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if !self.ctx.cancelled.swap(true, Ordering::SeqCst) {
            info!("cancellation requested, closing frontier");
            self.ctx.frontier.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.ctx.cancelled.load(Ordering::SeqCst)
    }
}

/// A crawl in progress
///
/// Drain `records` first; it yields `None` once every worker has
/// finished. Then call [`wait`](CrawlRun::wait) for the outcome.
/// Dropping the receiver early also stops the run, since workers close
/// the frontier when they can no longer deliver records.
pub struct CrawlRun {
    pub records: mpsc::Receiver<PageRecord>,
    cancel: CancelHandle,
    handle: JoinHandle<RunOutcome>,
}

impl CrawlRun {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Waits for all workers to finish and returns the run's outcome
    pub async fn wait(self) -> Result<RunOutcome> {
        drop(self.records);
        Ok(self.handle.await?)
    }
}

/// Builds and launches crawl runs
pub struct Coordinator;

impl Coordinator {
    /// Starts a crawl
    ///
    /// The seed is normalized up front; an unparseable or non-http(s)
    /// seed is the one fatal error, returned before any work happens.
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated crawl configuration
    pub fn start(config: CrawlConfig) -> Result<CrawlRun> {
        crate::config::validate(&config)?;

        let seed = normalize_url(&config.seed_url).map_err(|e| CrawlError::InvalidSeed {
            url: config.seed_url.clone(),
            source: e,
        })?;
        let seed_host = extract_host(&seed).ok_or(CrawlError::Url(UrlError::MissingHost))?;

        let client = build_http_client(&config)?;
        let robots = RobotsPolicy::new(
            client.clone(),
            config.user_agent.clone(),
            config.respect_robots,
        );

        let frontier = Frontier::new(config.max_pages, config.max_depth);
        frontier.try_enqueue(seed.clone(), 0);

        info!(
            seed = %seed,
            max_pages = config.max_pages,
            concurrency = config.concurrency,
            "starting crawl"
        );

        let concurrency = config.concurrency;
        let ctx = Arc::new(CrawlContext {
            config,
            client,
            frontier,
            robots,
            delays: HostDelays::new(),
            cancelled: AtomicBool::new(false),
            seed_host,
            pages_visited: AtomicUsize::new(0),
        });

        let (tx, rx) = mpsc::channel(RECORD_CHANNEL_CAPACITY);

        let workers: Vec<JoinHandle<()>> = (0..concurrency)
            .map(|worker_id| {
                let ctx = Arc::clone(&ctx);
                let tx = tx.clone();
                tokio::spawn(worker_loop(worker_id, ctx, tx))
            })
            .collect();
        drop(tx);

        let cancel = CancelHandle {
            ctx: Arc::clone(&ctx),
        };

        let handle = tokio::spawn(async move {
            for worker in workers {
                if let Err(e) = worker.await {
                    warn!(error = %e, "crawl worker panicked");
                }
            }

            let status = if ctx.cancelled.load(Ordering::SeqCst) {
                RunStatus::Aborted
            } else {
                RunStatus::Completed
            };
            let pages_visited = ctx.pages_visited.load(Ordering::SeqCst);
            info!(?status, pages_visited, "crawl finished");

            RunOutcome {
                status,
                pages_visited,
            }
        });

        Ok(CrawlRun {
            records: rx,
            cancel,
            handle,
        })
    }
}

/// One fetch worker: dequeue, gate, fetch, extract, emit, repeat
async fn worker_loop(worker_id: usize, ctx: Arc<CrawlContext>, tx: mpsc::Sender<PageRecord>) {
    while let Some(target) = ctx.frontier.next().await {
        process_target(&ctx, &tx, target).await;
        ctx.frontier.task_done();
    }
    debug!(worker_id, "worker done");
}

async fn process_target(ctx: &CrawlContext, tx: &mpsc::Sender<PageRecord>, target: CrawlTarget) {
    let CrawlTarget { url, depth } = target;

    let verdict = ctx.robots.check(&url).await;
    if !verdict.allowed {
        debug!(url = %url, "disallowed by robots.txt, skipping");
        return;
    }

    // The robots Crawl-delay hint can only slow the crawl down, never
    // speed it up past the configured delay.
    let mut delay = ctx.config.delay();
    if let Some(hint) = verdict.crawl_delay {
        if hint.is_finite() && hint >= 0.0 {
            delay = delay.max(Duration::from_secs_f64(hint));
        }
    }

    if let Some(host) = extract_host(&url) {
        ctx.delays.acquire(&host, delay).await;
    }

    debug!(url = %url, depth, "fetching");

    let record = match fetch_page(&ctx.client, &url).await {
        Ok(page) => {
            let mut record = PageRecord::new(url.as_str().to_string(), depth);
            record.final_url = page.final_url.as_str().to_string();
            record.status_code = page.status;

            if (200..300).contains(&page.status) {
                // Html is not Send, so parsing and extraction stay inside
                // this block with no await in scope.
                let (extract, links) = {
                    let document = Html::parse_document(&page.body);
                    let extract = extract_metadata(&document);
                    let links = collect_links(&document, &page.final_url, &ctx.seed_host);
                    (extract, links)
                };

                record.title = extract.title;
                record.meta_description = extract.meta_description;
                record.h1 = extract.h1;
                record.h2s = extract.h2s;
                record.canonical = extract.canonical;
                record.meta_robots = extract.meta_robots;
                record.word_count = extract.word_count;
                record.image_count = extract.image_count;
                record.images_with_alt = extract.images_with_alt;
                record.internal_links = links.internal_count;
                record.external_links = links.external_count;

                for link in links.internal {
                    ctx.frontier.try_enqueue(link, depth + 1);
                }
            } else {
                debug!(url = %url, status = page.status, "non-success status");
            }

            record
        }
        Err(e) => {
            warn!(url = %url, error = %e, "fetch failed");
            PageRecord::from_error(url.as_str().to_string(), depth, e.to_string())
        }
    };

    ctx.pages_visited.fetch_add(1, Ordering::SeqCst);

    // A dropped receiver means nobody wants the rest of the crawl
    if tx.send(record).await.is_err() {
        ctx.frontier.close();
    }
}
