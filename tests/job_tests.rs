//! End-to-end crawl job tests
//!
//! These tests run full crawl jobs against wiremock servers and assert the
//! frontier bounds, deduplication, error policy, and job counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use civicrawl::config::SourceConfig;
use civicrawl::crawler::{CrawlJob, CrawlJobResult};
use civicrawl::enrich::{Enricher, Summarizer};
use civicrawl::store::{
    ContentStore, JobLogSink, NewContentRecord, NewProcessedDocument, ProcessedDocument,
    SqliteStore, StoreError, StoreResult, StoredContentRecord,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// A paragraph comfortably above the minimum content threshold
fn long_paragraph(marker: &str) -> String {
    format!(
        "{marker} This resolution of the city council concerns the annual \
         budget and the procurement plan for the coming fiscal year, \
         including road maintenance and public infrastructure works."
    )
}

fn html_page(title: &str, body: &str, links: &[&str]) -> String {
    let links: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">link</a>"#))
        .collect();
    format!(
        "<html><head><title>{title}</title></head><body><p>{body}</p>{links}</body></html>"
    )
}

async fn mount_page(server: &MockServer, page_path: &str, html: String, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .expect(expected_fetches)
        .mount(server)
        .await;
}

fn test_config(server: &MockServer) -> SourceConfig {
    // RUST_LOG=civicrawl=debug surfaces the crawl trace when a test fails
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut config = SourceConfig::new("test-src", "Test Source", &server.uri());
    config.delay_ms = 0;
    config
}

#[tokio::test]
async fn test_cyclic_graph_fetches_each_url_once() {
    let server = MockServer::start().await;

    // Seed, /a and /b all link to each other; the walk must not loop
    mount_page(
        &server,
        "/",
        html_page("Home", &long_paragraph("home"), &["/a", "/b"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page("A", &long_paragraph("page-a"), &["/", "/b"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/b",
        html_page("B", &long_paragraph("page-b"), &["/", "/a"]),
        1,
    )
    .await;

    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        Enricher::disabled(),
    );
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 3);
    assert_eq!(result.items_processed, 3);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_max_pages_stops_the_frontier() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            &long_paragraph("home"),
            &["/p1", "/p2", "/p3", "/p4", "/p5"],
        ),
        1,
    )
    .await;
    // None of the five linked pages may be fetched
    for p in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(&server, p, html_page("P", &long_paragraph("p"), &[]), 0).await;
    }

    let mut config = test_config(&server);
    config.max_pages = 1;

    let job = CrawlJob::new(config, SqliteStore::new_in_memory().unwrap(), Enricher::disabled());
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 1);
    assert_eq!(result.items_processed, 1);
}

#[tokio::test]
async fn test_max_depth_bounds_the_walk() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", &long_paragraph("home"), &["/d1"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/d1",
        html_page("D1", &long_paragraph("depth-one"), &["/d2"]),
        1,
    )
    .await;
    // Depth 2 is beyond the bound and must never be fetched
    mount_page(&server, "/d2", html_page("D2", &long_paragraph("depth-two"), &[]), 0).await;

    let mut config = test_config(&server);
    config.max_depth = 1;

    let job = CrawlJob::new(config, SqliteStore::new_in_memory().unwrap(), Enricher::disabled());
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 2);
}

#[tokio::test]
async fn test_rerun_on_unchanged_content_processes_nothing_new() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", &long_paragraph("home"), &["/a"]),
        2,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page("A", &long_paragraph("page-a"), &[]),
        2,
    )
    .await;

    let store = SqliteStore::new_in_memory().unwrap();

    let job = CrawlJob::new(test_config(&server), store, Enricher::disabled());
    let (first, store) = job.run().await.unwrap();
    assert_eq!(first.items_scraped, 2);
    assert_eq!(first.items_processed, 2);

    let job = CrawlJob::new(test_config(&server), store, Enricher::disabled());
    let (second, store) = job.run().await.unwrap();

    assert!(second.success);
    assert_eq!(second.items_scraped, first.items_scraped);
    assert_eq!(second.items_processed, 0);
    assert_eq!(store.count_raw("test-src").unwrap(), 2);
    assert_eq!(store.count_processed("test-src").unwrap(), 2);
}

struct AlwaysFailingSummarizer;

#[async_trait]
impl Summarizer for AlwaysFailingSummarizer {
    async fn summarize(&self, _text: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("summarizer is down")
    }
}

#[tokio::test]
async fn test_summarizer_failure_does_not_affect_processing() {
    let server = MockServer::start().await;

    // Content above the summarization threshold
    let body = long_paragraph("enrich").repeat(5);
    mount_page(&server, "/", html_page("Home", &body, &[]), 1).await;

    let enricher = Enricher::new(Some(Arc::new(AlwaysFailingSummarizer)), None);
    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        enricher,
    );
    let (result, store) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_processed, 1);
    // Enrichment failures are degraded mode, not job errors
    assert!(result.errors.is_empty());

    let record = store
        .find_by_hash("test-src", &civicrawl::crawler::parser::content_hash(&{
            // Content as the parser cleans it: collapsed whitespace
            body.split_whitespace().collect::<Vec<_>>().join(" ")
        }))
        .unwrap()
        .expect("raw record should exist");
    let doc = store
        .find_processed_by_content(record.id)
        .unwrap()
        .expect("processed document should exist");
    assert!(doc.summary.is_none());
    assert!(!doc.content.is_empty());
}

#[tokio::test]
async fn test_short_seed_still_enqueues_links() {
    let server = MockServer::start().await;

    // Seed content is below the minimum threshold; its links still crawl
    mount_page(
        &server,
        "/",
        html_page("Home", "too short", &["/a", "/b"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page("A", &long_paragraph("page-a"), &[]),
        1,
    )
    .await;
    mount_page(&server, "/b", html_page("B", "also short", &[]), 1).await;

    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        Enricher::disabled(),
    );
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    // Only /a qualifies
    assert_eq!(result.items_scraped, 1);
    assert_eq!(result.items_processed, 1);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_failed_seed_fetch_is_recorded_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        Enricher::disabled(),
    );
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Fetch error for"));
    assert!(result.errors[0].contains("http-status:500"));
}

#[tokio::test]
async fn test_non_html_links_are_skipped_silently() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Home", &long_paragraph("home"), &["/feed"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<rss/>", "application/rss+xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        Enricher::disabled(),
    );
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 1);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_invalid_config_aborts_before_any_fetch() {
    let server = MockServer::start().await;
    // Any fetch at all is a failure
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.seed_url = "not a url".to_string();

    let job = CrawlJob::new(config, SqliteStore::new_in_memory().unwrap(), Enricher::disabled());
    assert!(job.run().await.is_err());
}

/// Delegates to SQLite but fails the per-source timestamp write and records
/// whether the job-log end entry was written
struct TimestampFailingStore {
    inner: SqliteStore,
    job_end_recorded: bool,
}

impl ContentStore for TimestampFailingStore {
    fn find_by_hash(
        &self,
        source_id: &str,
        content_hash: &str,
    ) -> StoreResult<Option<StoredContentRecord>> {
        self.inner.find_by_hash(source_id, content_hash)
    }

    fn insert_raw(&mut self, record: NewContentRecord) -> StoreResult<StoredContentRecord> {
        self.inner.insert_raw(record)
    }

    fn has_processed(&self, source_content_id: i64) -> StoreResult<bool> {
        self.inner.has_processed(source_content_id)
    }

    fn insert_processed(&mut self, doc: NewProcessedDocument) -> StoreResult<ProcessedDocument> {
        self.inner.insert_processed(doc)
    }

    fn mark_source_crawled(&mut self, _source_id: &str, _at: DateTime<Utc>) -> StoreResult<()> {
        Err(StoreError::Database("disk full".to_string()))
    }

    fn count_raw(&self, source_id: &str) -> StoreResult<u64> {
        self.inner.count_raw(source_id)
    }

    fn count_processed(&self, source_id: &str) -> StoreResult<u64> {
        self.inner.count_processed(source_id)
    }
}

impl JobLogSink for TimestampFailingStore {
    fn record_job_start(&mut self, source_id: &str) -> StoreResult<i64> {
        self.inner.record_job_start(source_id)
    }

    fn record_job_end(&mut self, job_log_id: i64, result: &CrawlJobResult) -> StoreResult<()> {
        self.job_end_recorded = true;
        self.inner.record_job_end(job_log_id, result)
    }
}

#[tokio::test]
async fn test_failed_timestamp_write_still_writes_job_log_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Home", &long_paragraph("home"), &[]), 1).await;

    let store = TimestampFailingStore {
        inner: SqliteStore::new_in_memory().unwrap(),
        job_end_recorded: false,
    };
    let job = CrawlJob::new(test_config(&server), store, Enricher::disabled());
    let (result, store) = job.run().await.unwrap();

    // The counters survive and the end entry is still written
    assert!(result.success);
    assert_eq!(result.items_scraped, 1);
    assert_eq!(result.items_processed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Persistence error"));
    assert!(store.job_end_recorded);
}

/// Serves a fixed page and trips the stop flag while doing so
struct StopWhileServing {
    stop: Arc<AtomicBool>,
    html: String,
}

impl Respond for StopWhileServing {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.stop.store(true, Ordering::Relaxed);
        ResponseTemplate::new(200).set_body_raw(self.html.clone(), "text/html; charset=utf-8")
    }
}

#[tokio::test]
async fn test_stop_flag_ends_the_job_after_current_iteration() {
    let server = MockServer::start().await;

    let job = CrawlJob::new(
        test_config(&server),
        SqliteStore::new_in_memory().unwrap(),
        Enricher::disabled(),
    );
    let stop = job.stop_handle();

    // The seed fetch itself requests the stop; its links must never crawl
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(StopWhileServing {
            stop,
            html: html_page("Home", &long_paragraph("home"), &["/a", "/b"]),
        })
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/a", html_page("A", &long_paragraph("page-a"), &[]), 0).await;
    mount_page(&server, "/b", html_page("B", &long_paragraph("page-b"), &[]), 0).await;

    let (result, store) = job.run().await.unwrap();

    // The iteration in flight completes; the job then ends cleanly
    assert!(result.success);
    assert_eq!(result.items_scraped, 1);
    assert_eq!(result.items_processed, 1);
    assert!(result.errors.is_empty());
    assert_eq!(store.count_processed("test-src").unwrap(), 1);
}

#[tokio::test]
async fn test_exclude_pattern_keeps_urls_out_of_the_frontier() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            &long_paragraph("home"),
            &["/docs/1", "/archive/old"],
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/docs/1",
        html_page("Doc", &long_paragraph("doc-one"), &[]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/archive/old",
        html_page("Old", &long_paragraph("archived"), &[]),
        0,
    )
    .await;

    let mut config = test_config(&server);
    config.url_patterns.exclude = vec!["/archive/".to_string()];

    let job = CrawlJob::new(config, SqliteStore::new_in_memory().unwrap(), Enricher::disabled());
    let (result, _) = job.run().await.unwrap();

    assert!(result.success);
    assert_eq!(result.items_scraped, 2);
}
