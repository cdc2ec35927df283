//! Crawl job controller
//!
//! Wires the frontier, fetcher, parser, deduplicator, classifier, and
//! enrichment into one sequential run over a single source:
//!
//! fetch → parse → dedup → classify → enrich → persist → enqueue links →
//! politeness delay → repeat until the bounds are exhausted.
//!
//! Error policy:
//! - A missing or invalid source configuration is fatal and aborts the job
//!   before any fetch, with `success = false`
//! - Fetch and persistence failures are recorded in `errors` and the loop
//!   continues; the job still reports `success = true`
//! - Non-HTML responses and enrichment failures are not errors at all
//!
//! The job log receives exactly one start entry and one end entry on every
//! path, fatal or not.

use crate::classify::{classify, extract_keywords};
use crate::config::{validate, SourceConfig};
use crate::crawler::dedup::check_and_record;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::frontier::{Frontier, FrontierTier};
use crate::crawler::parser::parse_page;
use crate::enrich::Enricher;
use crate::store::{ContentStore, JobLogSink, NewProcessedDocument};
use crate::url::{LinkDecision, UrlFilter};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Pages with less cleaned content than this are dropped, not persisted
const MIN_CONTENT_CHARS: usize = 100;

/// Final counters of one crawl job run
///
/// `items_scraped` counts accepted qualifying pages, duplicates included;
/// `items_processed` counts newly persisted processed documents. On an
/// unchanged re-crawl the first stays the same and the second drops to zero.
#[derive(Debug, Clone, Default)]
pub struct CrawlJobResult {
    pub success: bool,
    pub items_scraped: u32,
    pub items_processed: u32,
    pub errors: Vec<String>,
}

/// One crawl run over one source
pub struct CrawlJob<S> {
    config: SourceConfig,
    store: S,
    enricher: Enricher,
    stop: Arc<AtomicBool>,
}

impl<S> CrawlJob<S>
where
    S: ContentStore + JobLogSink,
{
    pub fn new(config: SourceConfig, store: S, enricher: Enricher) -> Self {
        Self {
            config,
            store,
            enricher,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for cooperative early termination
    ///
    /// Setting the flag stops the job after the iteration in flight; it never
    /// interrupts a fetch or a store write mid-way.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the job to completion and returns the final counters
    ///
    /// Also hands the store back so the caller can keep using it.
    pub async fn run(mut self) -> crate::Result<(CrawlJobResult, S)> {
        let job_log_id = self.store.record_job_start(&self.config.source_id)?;
        let mut result = CrawlJobResult::default();

        if let Err(e) = validate(&self.config) {
            warn!("Aborting job for {}: {e}", self.config.source_id);
            result.errors.push(format!("Config error: {e}"));
            self.store.record_job_end(job_log_id, &result)?;
            return Err(e.into());
        }

        match self.crawl(&mut result).await {
            Ok(()) => {
                result.success = true;
                // A failed timestamp write is a persistence error like any
                // other; the job-log end entry must still be written
                if let Err(e) = self
                    .store
                    .mark_source_crawled(&self.config.source_id, Utc::now())
                {
                    warn!(
                        "Failed to record crawl timestamp for {}: {e}",
                        self.config.source_id
                    );
                    result.errors.push(format!("Persistence error: {e}"));
                }
            }
            Err(e) => {
                warn!("Job for {} failed: {e}", self.config.source_id);
                result.errors.push(e.to_string());
            }
        }

        self.store.record_job_end(job_log_id, &result)?;
        info!(
            "Job for {} finished: {} scraped, {} processed, {} errors",
            self.config.source_id,
            result.items_scraped,
            result.items_processed,
            result.errors.len()
        );
        Ok((result, self.store))
    }

    async fn crawl(&mut self, result: &mut CrawlJobResult) -> crate::Result<()> {
        // Validation already guaranteed the seed parses
        let seed = Url::parse(&self.config.seed_url)?;
        let filter = UrlFilter::new(&seed, &self.config.url_patterns);
        let mut frontier = Frontier::new(seed, self.config.max_pages, self.config.max_depth);
        let client = build_http_client()?;
        let mut first_fetch = true;

        while let Some(entry) = frontier.next() {
            if self.stop.load(Ordering::Relaxed) {
                info!("Stop requested, ending job for {}", self.config.source_id);
                break;
            }

            if !first_fetch {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
            first_fetch = false;

            debug!("Fetching {} (depth {})", entry.url, entry.depth);
            let html = match fetch_page(&client, &entry.url).await {
                FetchOutcome::Ok { html, .. } => html,
                FetchOutcome::SkippedNonHtml => continue,
                FetchOutcome::Failed(reason) => {
                    warn!("Fetch failed for {}: {reason}", entry.url);
                    result
                        .errors
                        .push(format!("Fetch error for {}: {reason}", entry.url));
                    continue;
                }
            };

            let page = parse_page(&html, &entry.url, &self.config.selectors);

            // Links enter the frontier whether or not the page qualifies
            for link in &page.links {
                match filter.classify(link) {
                    LinkDecision::Priority => {
                        frontier.push(link.clone(), entry.depth, FrontierTier::Priority)
                    }
                    LinkDecision::Normal => {
                        frontier.push(link.clone(), entry.depth, FrontierTier::Normal)
                    }
                    LinkDecision::Rejected => {}
                }
            }

            if page.content.chars().count() < MIN_CONTENT_CHARS {
                debug!("Dropping {}: content below minimum length", entry.url);
                continue;
            }

            frontier.record_accepted();
            result.items_scraped += 1;

            let record = match check_and_record(&mut self.store, &self.config.source_id, &page) {
                Ok(outcome) => {
                    if !outcome.is_new {
                        debug!("Duplicate content at {}, already stored", entry.url);
                    }
                    outcome.record
                }
                Err(e) => {
                    warn!("Store write failed for {}: {e}", entry.url);
                    result
                        .errors
                        .push(format!("Persistence error for {}: {e}", entry.url));
                    continue;
                }
            };

            match self.process_record(record.id, &page).await {
                Ok(true) => result.items_processed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Processing failed for {}: {e}", entry.url);
                    result
                        .errors
                        .push(format!("Persistence error for {}: {e}", entry.url));
                }
            }
        }

        Ok(())
    }

    /// Classifies, enriches, and persists one stored record
    ///
    /// Returns false when the record already has a processed document.
    async fn process_record(
        &mut self,
        source_content_id: i64,
        page: &crate::crawler::ParsedPage,
    ) -> crate::store::StoreResult<bool> {
        if self.store.has_processed(source_content_id)? {
            return Ok(false);
        }

        let document_type = classify(&page.title, &page.content);
        let keywords = extract_keywords(&page.title, &page.content);
        let enrichment = self.enricher.enrich(&page.title, &page.content).await;

        self.store.insert_processed(NewProcessedDocument {
            source_id: self.config.source_id.clone(),
            source_content_id,
            document_type,
            title: page.title.clone(),
            content: page.content.clone(),
            summary: enrichment.summary,
            keywords,
            embedding: enrichment.embedding,
        })?;

        Ok(true)
    }
}
