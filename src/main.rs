//! seoscope main entry point
//!
//! Command-line interface for the seoscope SEO audit crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use seoscope::config::{load_config, CrawlConfig};
use seoscope::output::{print_stats, CrawlStats, CsvSink, JsonSink};
use seoscope::{Coordinator, RunStatus};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// seoscope: a polite on-page SEO audit crawler
///
/// Crawls a website breadth-first from a seed URL, respecting robots.txt
/// and a per-host request delay, and writes one audit row per page.
#[derive(Parser, Debug)]
#[command(name = "seoscope")]
#[command(version)]
#[command(about = "A polite on-page SEO audit crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl (required unless --config provides seed-url)
    #[arg(value_name = "URL")]
    seed_url: Option<String>,

    /// Path to TOML configuration file; CLI flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum link depth from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Seconds between requests to the same host
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// User-Agent header value
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of concurrent fetch workers
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Skip TLS certificate verification (staging hosts only)
    #[arg(long)]
    insecure: bool,

    /// Ignore robots.txt entirely
    #[arg(long)]
    no_robots: bool,

    /// Output file path; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let run = Coordinator::start(config)?;

    // Ctrl-C closes the frontier; in-flight fetches finish and every
    // record received so far still gets written.
    let cancel = run.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    let outcome = consume_records(run, &cli).await?;

    if outcome.status == RunStatus::Aborted {
        tracing::warn!("crawl aborted after {} pages", outcome.pages_visited);
    }

    Ok(())
}

/// Assembles the effective config: file values first, then CLI overrides
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let seed = cli
                .seed_url
                .clone()
                .context("a seed URL is required (positional argument or --config)")?;
            CrawlConfig::new(seed)
        }
    };

    if let Some(seed) = &cli.seed_url {
        config.seed_url = seed.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = Some(max_depth);
    }
    if let Some(delay) = cli.delay {
        config.delay_seconds = delay;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if cli.insecure {
        config.verify_tls = false;
    }
    if cli.no_robots {
        config.respect_robots = false;
    }

    Ok(config)
}

/// Drains the record stream into the selected sink, then prints the
/// summary and returns the run's outcome
async fn consume_records(
    mut run: seoscope::CrawlRun,
    cli: &Cli,
) -> anyhow::Result<seoscope::RunOutcome> {
    let mut stats = CrawlStats::new();

    match (cli.format, &cli.output) {
        (Format::Csv, Some(path)) => {
            let mut sink = CsvSink::create(path)?;
            while let Some(record) = run.records.recv().await {
                stats.observe(&record);
                sink.write(&record)?;
            }
            sink.finish()?;
        }
        (Format::Csv, None) => {
            let mut sink = CsvSink::from_writer(std::io::stdout())?;
            while let Some(record) = run.records.recv().await {
                stats.observe(&record);
                sink.write(&record)?;
            }
            sink.finish()?;
        }
        (Format::Json, Some(path)) => {
            let mut sink = JsonSink::create(path)?;
            while let Some(record) = run.records.recv().await {
                stats.observe(&record);
                sink.write(&record)?;
            }
            sink.finish()?;
        }
        (Format::Json, None) => {
            let mut sink = JsonSink::from_writer(std::io::stdout());
            while let Some(record) = run.records.recv().await {
                stats.observe(&record);
                sink.write(&record)?;
            }
            sink.finish()?;
        }
    }

    let outcome = run.wait().await?;

    if !cli.quiet {
        if let Some(path) = &cli.output {
            eprintln!("Wrote {} records to {}", stats.pages, path.display());
        }
        print_stats(&stats);
    }

    Ok(outcome)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seoscope=info,warn"),
            1 => EnvFilter::new("seoscope=debug,info"),
            2 => EnvFilter::new("seoscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
