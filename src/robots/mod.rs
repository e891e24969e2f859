//! Robots.txt handling module
//!
//! Fetches, parses, and caches robots.txt per host for the lifetime of a
//! crawl run. A host's rules are fetched at most once; concurrent first
//! queries for the same host coalesce onto a single in-flight fetch.

mod parser;

pub use parser::RobotsRules;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

/// The answer to "may I fetch this URL, and how fast?"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotsVerdict {
    /// Whether the URL may be fetched
    pub allowed: bool,
    /// Crawl-delay hint in seconds, if the host's robots.txt declares one
    pub crawl_delay: Option<f64>,
}

impl RobotsVerdict {
    /// Verdict used when robots handling is disabled or unavailable
    pub fn allow() -> Self {
        Self {
            allowed: true,
            crawl_delay: None,
        }
    }
}

/// Robots.txt rules cached for one host; rules live for the whole run
#[derive(Debug, Clone)]
struct CachedRobots {
    rules: RobotsRules,
}

/// Per-run robots.txt policy with a coalescing per-host cache
///
/// The cache maps a host key (`host` or `host:port`) to a `OnceCell`;
/// workers that race on the same uncached host all await the same cell,
/// so the origin sees exactly one robots.txt request.
pub struct RobotsPolicy {
    client: reqwest::Client,
    user_agent: String,
    respect: bool,
    cache: Mutex<HashMap<String, Arc<OnceCell<CachedRobots>>>>,
}

impl RobotsPolicy {
    /// Creates a policy bound to the run's HTTP client and user agent
    ///
    /// When `respect` is false the policy never fetches robots.txt and
    /// every check is allowed.
    pub fn new(client: reqwest::Client, user_agent: String, respect: bool) -> Self {
        Self {
            client,
            user_agent,
            respect,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL may be fetched, fetching the host's robots.txt
    /// on first use
    pub async fn check(&self, url: &Url) -> RobotsVerdict {
        if !self.respect {
            return RobotsVerdict::allow();
        }

        let Some(key) = host_key(url) else {
            return RobotsVerdict::allow();
        };

        let cell = {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                // A panic while holding this lock cannot corrupt a HashMap
                // of Arcs, so keep serving the poisoned map.
                Err(poisoned) => poisoned.into_inner(),
            };
            Arc::clone(cache.entry(key).or_default())
        };

        let cached = cell
            .get_or_init(|| async { self.fetch_rules(url).await })
            .await;

        RobotsVerdict {
            allowed: cached.rules.is_allowed(url.as_str(), &self.user_agent),
            crawl_delay: cached.rules.crawl_delay(&self.user_agent),
        }
    }

    /// Fetches and parses robots.txt for the URL's origin
    ///
    /// Any failure (network error, non-2xx, unreadable body) degrades to
    /// allow-all for the rest of the run.
    async fn fetch_rules(&self, url: &Url) -> CachedRobots {
        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        debug!(url = %robots_url, "fetching robots.txt");

        let rules = match self.client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => RobotsRules::from_content(&body),
                Err(e) => {
                    warn!(url = %robots_url, error = %e, "failed to read robots.txt body, allowing all");
                    RobotsRules::allow_all()
                }
            },
            Ok(response) => {
                debug!(url = %robots_url, status = %response.status(), "no usable robots.txt, allowing all");
                RobotsRules::allow_all()
            }
            Err(e) => {
                warn!(url = %robots_url, error = %e, "failed to fetch robots.txt, allowing all");
                RobotsRules::allow_all()
            }
        };

        CachedRobots { rules }
    }
}

/// Cache key for a URL's origin: host, plus the port when non-default
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
