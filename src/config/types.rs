use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a crawl run
///
/// Every field except `seed_url` has a default, so a one-line TOML file
/// (or a bare seed URL on the CLI) is enough to start a crawl.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of URLs ever admitted to the frontier
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link distance from the seed; None means unbounded
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    /// Minimum seconds between requests to the same host
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether to verify TLS certificates
    #[serde(rename = "verify-tls", default = "default_true")]
    pub verify_tls: bool,

    /// Whether to fetch and honor robots.txt
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    /// Number of concurrent fetch workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_max_pages() -> usize {
    50
}

fn default_delay_seconds() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    concat!("seoscope/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

impl CrawlConfig {
    /// Creates a configuration with all defaults for the given seed URL
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_pages: default_max_pages(),
            max_depth: None,
            delay_seconds: default_delay_seconds(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
            verify_tls: true,
            respect_robots: true,
            concurrency: default_concurrency(),
        }
    }

    /// Per-host delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
