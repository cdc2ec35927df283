//! Store traits and error types

use crate::crawler::CrawlJobResult;
use crate::store::{NewContentRecord, NewProcessedDocument, ProcessedDocument, StoredContentRecord};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence interface for crawled and processed content
///
/// Implementations are used sequentially within a job; concurrent jobs target
/// different sources and never contend on the same `source_id`.
pub trait ContentStore: Send {
    /// Looks up a raw record by `(source_id, content_hash)`
    ///
    /// A hit means the content was seen on an earlier crawl and must not be
    /// re-persisted or re-classified.
    fn find_by_hash(
        &self,
        source_id: &str,
        content_hash: &str,
    ) -> StoreResult<Option<StoredContentRecord>>;

    /// Inserts a raw content record, returning it with its assigned id
    fn insert_raw(&mut self, record: NewContentRecord) -> StoreResult<StoredContentRecord>;

    /// Returns true if a processed document already exists for this raw record
    fn has_processed(&self, source_content_id: i64) -> StoreResult<bool>;

    /// Inserts a processed document, returning it with its assigned id
    fn insert_processed(&mut self, doc: NewProcessedDocument) -> StoreResult<ProcessedDocument>;

    /// Records when a source was last crawled
    fn mark_source_crawled(&mut self, source_id: &str, at: DateTime<Utc>) -> StoreResult<()>;

    // ===== Statistics (used by callers and tests) =====

    /// Counts raw records for a source
    fn count_raw(&self, source_id: &str) -> StoreResult<u64>;

    /// Counts processed documents for a source
    fn count_processed(&self, source_id: &str) -> StoreResult<u64>;
}

/// Sink for crawl run outcomes
///
/// Every job writes exactly one start entry and one end entry; the end entry
/// is written on both the success and the failure path.
pub trait JobLogSink: Send {
    /// Records the start of a crawl job, returning the job log id
    fn record_job_start(&mut self, source_id: &str) -> StoreResult<i64>;

    /// Records the final outcome of a crawl job
    fn record_job_end(&mut self, job_log_id: i64, result: &CrawlJobResult) -> StoreResult<()>;
}
