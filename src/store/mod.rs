//! Content store module
//!
//! Persists everything a crawl job produces:
//! - Raw fetched content, keyed by `(source_id, content_hash)`, which is
//!   the deduplication contract
//! - Classified/enriched documents, at most one per raw record
//! - Per-source crawl timestamps
//! - Job log entries with the final counters of every run
//!
//! The [`ContentStore`] and [`JobLogSink`] traits define the interface; the
//! SQLite backend implements both.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{ContentStore, JobLogSink, StoreError, StoreResult};

use crate::classify::DocumentType;
use chrono::{DateTime, Utc};

/// A raw fetched document as persisted on first sight of its content hash
///
/// Uniqueness invariant: at most one record exists per
/// `(source_id, content_hash)` pair. Records are never updated or deleted by
/// the crawl core.
#[derive(Debug, Clone)]
pub struct StoredContentRecord {
    pub id: i64,
    pub source_id: String,
    pub url: String,
    pub title: String,
    pub content_hash: String,
    pub raw_content: String,
    /// Attachment links discovered on the page (recorded, not crawled)
    pub pdf_links: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Input for inserting a new raw content record
#[derive(Debug, Clone)]
pub struct NewContentRecord {
    pub source_id: String,
    pub url: String,
    pub title: String,
    pub content_hash: String,
    pub raw_content: String,
    pub pdf_links: Vec<String>,
}

/// A classified and optionally enriched document
///
/// Created once per [`StoredContentRecord`]; `source_content_id` is a weak
/// back-reference used for lookup only.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub id: i64,
    pub source_id: String,
    pub source_content_id: i64,
    pub document_type: DocumentType,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    /// Fixed-vocabulary subset, vocabulary order, at most 10 entries
    pub keywords: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub processed_at: DateTime<Utc>,
}

/// Input for inserting a new processed document
#[derive(Debug, Clone)]
pub struct NewProcessedDocument {
    pub source_id: String,
    pub source_content_id: i64,
    pub document_type: DocumentType,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}
