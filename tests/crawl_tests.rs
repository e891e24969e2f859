//! End-to-end crawl tests
//!
//! These tests run the full crawl cycle against wiremock servers: seed
//! normalization, robots.txt handling, frontier bounds, extraction, and
//! the record stream contract.

use seoscope::config::CrawlConfig;
use seoscope::{Coordinator, PageRecord, RunStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config tuned for tests: no politeness delay, sequential workers
fn test_config(seed: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(seed);
    config.delay_seconds = 0.0;
    config.user_agent = "seoscope-test".to_string();
    config
}

/// Runs a crawl to completion, collecting every record
async fn run_crawl(config: CrawlConfig) -> (Vec<PageRecord>, seoscope::RunOutcome) {
    let mut run = Coordinator::start(config).expect("crawl should start");
    let mut records = Vec::new();
    while let Some(record) = run.records.recv().await {
        records.push(record);
    }
    let outcome = run.wait().await.expect("crawl should finish");
    (records, outcome)
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
}

async fn mount_page(server: &MockServer, at: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(template)
        .mount(server)
        .await;
}

fn find<'a>(records: &'a [PageRecord], suffix: &str) -> &'a PageRecord {
    records
        .iter()
        .find(|r| r.url.ends_with(suffix))
        .unwrap_or_else(|| panic!("no record for *{}", suffix))
}

#[tokio::test]
async fn extracts_seo_fields_and_classifies_links() {
    let server = MockServer::start().await;

    let body = r#"
        <meta name="description" content="Quality widgets since 1999">
        <h1>Welcome</h1>
        <h2>Features</h2>
        <h2>Pricing</h2>
        <p>Some visible copy about widgets.</p>
        <a href="/about">About</a>
        <a href="/contact">Contact</a>
        <a href="https://elsewhere.example/partner">Partner</a>
        <img src="/logo.png" alt="Acme logo">
        <img src="/banner.png">
    "#;
    mount_page(&server, "/", html_page("Home", body)).await;
    mount_page(&server, "/about", html_page("About", "<h1>About us</h1>")).await;
    mount_page(&server, "/contact", html_page("Contact", "<h1>Reach us</h1>")).await;

    let (records, outcome) = run_crawl(test_config(&server.uri())).await;

    assert_eq!(records.len(), 3);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.pages_visited, 3);

    let home = find(&records, "/");
    assert_eq!(home.status_code, 200);
    assert_eq!(home.depth, 0);
    assert_eq!(home.title, "Home");
    assert_eq!(home.meta_description, "Quality widgets since 1999");
    assert_eq!(home.h1, "Welcome");
    assert_eq!(home.h2s, vec!["Features", "Pricing"]);
    assert_eq!(home.internal_links, 2);
    assert_eq!(home.external_links, 1);
    assert_eq!(home.image_count, 2);
    assert_eq!(home.images_with_alt, 1);
    assert!(home.error.is_none());

    assert_eq!(find(&records, "/about").depth, 1);
    assert_eq!(find(&records, "/contact").depth, 1);
}

#[tokio::test]
async fn non_success_status_yields_record_with_empty_fields() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/missing">Gone</a>"#),
    )
    .await;
    // The 404 body has a title, but non-success bodies are not parsed
    mount_page(
        &server,
        "/missing",
        ResponseTemplate::new(404)
            .insert_header("content-type", "text/html")
            .set_body_string("<html><head><title>Gone</title></head></html>"),
    )
    .await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;

    let missing = find(&records, "/missing");
    assert_eq!(missing.status_code, 404);
    assert_eq!(missing.title, "");
    assert_eq!(missing.word_count, 0);
    assert_eq!(missing.internal_links, 0);
    assert!(missing.error.is_none());
}

#[tokio::test]
async fn robots_disallowed_urls_are_never_fetched() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
    )
    .await;
    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            r#"<a href="/private/report">Secret</a><a href="/public">Public</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/public", html_page("Public", "")).await;
    Mock::given(method("GET"))
        .and(path("/private/report"))
        .respond_with(html_page("Secret", ""))
        .expect(0)
        .mount(&server)
        .await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;

    // The disallowed URL produces no record and no request
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.url.contains("/private")));
}

#[tokio::test]
async fn disabled_robots_skips_the_fetch_entirely() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", html_page("Home", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("A", "")).await;

    let mut config = test_config(&server.uri());
    config.respect_robots = false;
    let (records, _) = run_crawl(config).await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn unfetchable_robots_allows_everything() {
    let server = MockServer::start().await;

    // No /robots.txt mock mounted: wiremock answers 404
    mount_page(&server, "/", html_page("Home", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("A", "")).await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn max_pages_bounds_the_run() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_page(&server, "/a", html_page("A", "")).await;
    mount_page(&server, "/b", html_page("B", "")).await;

    let mut config = test_config(&server.uri());
    config.max_pages = 1;
    let (records, outcome) = run_crawl(config).await;

    assert_eq!(records.len(), 1);
    assert!(records[0].url.ends_with("/"));
    assert_eq!(outcome.status, RunStatus::Completed);
}

#[tokio::test]
async fn max_depth_bounds_link_chains() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Home", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("A", r#"<a href="/b">B</a>"#)).await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("B", ""))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.max_depth = Some(1);
    let (records, _) = run_crawl(config).await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn duplicate_links_are_visited_once() {
    let server = MockServer::start().await;

    // Three spellings of the same page, plus a cycle back to the seed
    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            r#"<a href="/about">1</a><a href="/about/">2</a><a href="/about#team">3</a>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("About", r#"<a href="/">Home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;

    assert_eq!(records.len(), 2);
    let home = find(&records, "/");
    // All three anchors count as internal links on the page itself
    assert_eq!(home.internal_links, 3);
}

#[tokio::test]
async fn breadth_first_order_with_single_worker() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_page(&server, "/a", html_page("A", r#"<a href="/c">C</a>"#)).await;
    mount_page(&server, "/b", html_page("B", "")).await;
    mount_page(&server, "/c", html_page("C", "")).await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;

    let order: Vec<String> = records
        .iter()
        .map(|r| {
            url::Url::parse(&r.url)
                .map(|u| u.path().to_string())
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(order, vec!["/", "/a", "/b", "/c"]);
    assert_eq!(find(&records, "/c").depth, 2);
}

#[tokio::test]
async fn redirects_are_followed_and_final_url_recorded() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(301).insert_header("location", "/home"),
    )
    .await;
    mount_page(&server, "/home", html_page("Home", "<h1>Landed</h1>")).await;

    let (records, _) = run_crawl(test_config(&server.uri())).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.status_code, 200);
    assert!(record.url.ends_with("/"));
    assert!(record.final_url.ends_with("/home"));
    assert_eq!(record.h1, "Landed");
}

#[tokio::test]
async fn fetch_failure_yields_error_record_and_crawl_continues() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#),
    )
    .await;
    // Responds well past the request timeout, so the fetch fails
    mount_page(
        &server,
        "/slow",
        html_page("Slow", "").set_delay(std::time::Duration::from_secs(5)),
    )
    .await;
    mount_page(&server, "/fast", html_page("Fast", "<h1>Quick</h1>")).await;

    let mut config = test_config(&server.uri());
    config.timeout_seconds = 1;
    let (records, outcome) = run_crawl(config).await;

    // The timed-out page is recorded, not fatal
    assert_eq!(records.len(), 3);
    assert_eq!(outcome.status, RunStatus::Completed);

    let slow = find(&records, "/slow");
    assert_eq!(slow.status_code, 0);
    assert!(slow.error.is_some());
    assert_eq!(slow.title, "");
    assert_eq!(slow.word_count, 0);

    let fast = find(&records, "/fast");
    assert_eq!(fast.status_code, 200);
    assert_eq!(fast.h1, "Quick");
    assert!(fast.error.is_none());
}

#[tokio::test]
async fn cancellation_stops_the_run_and_reports_aborted() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_page(&server, "/a", html_page("A", "")).await;
    mount_page(&server, "/b", html_page("B", "")).await;

    let mut run = Coordinator::start(test_config(&server.uri())).expect("crawl should start");
    let cancel = run.cancel_handle();

    // Take the seed record, then cancel before the queue drains
    let first = run.records.recv().await.expect("seed record");
    assert!(first.url.ends_with("/"));
    cancel.cancel();

    let mut rest = Vec::new();
    while let Some(record) = run.records.recv().await {
        rest.push(record);
    }
    let outcome = run.wait().await.expect("crawl should finish");

    assert_eq!(outcome.status, RunStatus::Aborted);
    // In-flight work may emit at most what was already dequeued
    assert!(rest.len() <= 2);
    assert_eq!(outcome.pages_visited, 1 + rest.len());
}

#[tokio::test]
async fn concurrent_run_emits_each_page_exactly_once() {
    let server = MockServer::start().await;

    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", html_page("Home", &links)).await;
    for i in 0..8 {
        mount_page(&server, &format!("/p{}", i), html_page("Page", "")).await;
    }

    let mut config = test_config(&server.uri());
    config.concurrency = 4;
    let (records, outcome) = run_crawl(config).await;

    assert_eq!(records.len(), 9);
    assert_eq!(outcome.status, RunStatus::Completed);

    let mut urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), 9);
}
