//! SQLite store implementation
//!
//! Implements [`ContentStore`] and [`JobLogSink`] on a single SQLite
//! connection. List-valued columns (attachment links, keywords, embeddings)
//! are stored as JSON text.

use crate::classify::DocumentType;
use crate::crawler::CrawlJobResult;
use crate::store::schema::initialize_schema;
use crate::store::traits::{ContentStore, JobLogSink, StoreError, StoreResult};
use crate::store::{
    NewContentRecord, NewProcessedDocument, ProcessedDocument, StoredContentRecord,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite-backed content store and job-log sink
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a database at the given path
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing and ephemeral runs)
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_content_record(row: &Row<'_>) -> rusqlite::Result<StoredContentRecord> {
        let pdf_links_json: String = row.get(6)?;
        let fetched_at: String = row.get(7)?;
        Ok(StoredContentRecord {
            id: row.get(0)?,
            source_id: row.get(1)?,
            url: row.get(2)?,
            title: row.get(3)?,
            content_hash: row.get(4)?,
            raw_content: row.get(5)?,
            pdf_links: serde_json::from_str(&pdf_links_json).unwrap_or_default(),
            fetched_at: parse_timestamp(&fetched_at),
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn to_json(value: &impl serde::Serialize) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl ContentStore for SqliteStore {
    fn find_by_hash(
        &self,
        source_id: &str,
        content_hash: &str,
    ) -> StoreResult<Option<StoredContentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_id, url, title, content_hash, raw_content, pdf_links, fetched_at
             FROM content_records
             WHERE source_id = ?1 AND content_hash = ?2",
        )?;

        let record = stmt
            .query_row(params![source_id, content_hash], Self::row_to_content_record)
            .optional()?;

        Ok(record)
    }

    fn insert_raw(&mut self, record: NewContentRecord) -> StoreResult<StoredContentRecord> {
        let fetched_at = Utc::now();
        let pdf_links = to_json(&record.pdf_links)?;

        self.conn.execute(
            "INSERT INTO content_records
                (source_id, url, title, content_hash, raw_content, pdf_links, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.source_id,
                record.url,
                record.title,
                record.content_hash,
                record.raw_content,
                pdf_links,
                fetched_at.to_rfc3339(),
            ],
        )?;

        Ok(StoredContentRecord {
            id: self.conn.last_insert_rowid(),
            source_id: record.source_id,
            url: record.url,
            title: record.title,
            content_hash: record.content_hash,
            raw_content: record.raw_content,
            pdf_links: record.pdf_links,
            fetched_at,
        })
    }

    fn has_processed(&self, source_content_id: i64) -> StoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM processed_documents WHERE source_content_id = ?1",
            params![source_content_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert_processed(&mut self, doc: NewProcessedDocument) -> StoreResult<ProcessedDocument> {
        let processed_at = Utc::now();
        let keywords = to_json(&doc.keywords)?;
        let embedding = doc.embedding.as_ref().map(to_json).transpose()?;

        self.conn.execute(
            "INSERT INTO processed_documents
                (source_id, source_content_id, document_type, title, content,
                 summary, keywords, embedding, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                doc.source_id,
                doc.source_content_id,
                doc.document_type.to_db_string(),
                doc.title,
                doc.content,
                doc.summary,
                keywords,
                embedding,
                processed_at.to_rfc3339(),
            ],
        )?;

        Ok(ProcessedDocument {
            id: self.conn.last_insert_rowid(),
            source_id: doc.source_id,
            source_content_id: doc.source_content_id,
            document_type: doc.document_type,
            title: doc.title,
            content: doc.content,
            summary: doc.summary,
            keywords: doc.keywords,
            embedding: doc.embedding,
            processed_at,
        })
    }

    fn mark_source_crawled(&mut self, source_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO crawled_sources (source_id, last_crawled_at) VALUES (?1, ?2)
             ON CONFLICT(source_id) DO UPDATE SET last_crawled_at = ?2",
            params![source_id, at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn count_raw(&self, source_id: &str) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM content_records WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_processed(&self, source_id: &str) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM processed_documents WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl JobLogSink for SqliteStore {
    fn record_job_start(&mut self, source_id: &str) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO job_logs (source_id, started_at) VALUES (?1, ?2)",
            params![source_id, Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn record_job_end(&mut self, job_log_id: i64, result: &CrawlJobResult) -> StoreResult<()> {
        let errors = to_json(&result.errors)?;
        self.conn.execute(
            "UPDATE job_logs
             SET finished_at = ?1, success = ?2, items_scraped = ?3,
                 items_processed = ?4, errors = ?5
             WHERE id = ?6",
            params![
                Utc::now().to_rfc3339(),
                result.success,
                result.items_scraped,
                result.items_processed,
                errors,
                job_log_id,
            ],
        )?;
        Ok(())
    }
}

impl SqliteStore {
    /// Loads a processed document by its raw-record back-reference
    pub fn find_processed_by_content(
        &self,
        source_content_id: i64,
    ) -> StoreResult<Option<ProcessedDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_id, source_content_id, document_type, title, content,
                    summary, keywords, embedding, processed_at
             FROM processed_documents
             WHERE source_content_id = ?1",
        )?;

        let doc = stmt
            .query_row(params![source_content_id], |row| {
                let doc_type: String = row.get(3)?;
                let keywords_json: String = row.get(7)?;
                let embedding_json: Option<String> = row.get(8)?;
                let processed_at: String = row.get(9)?;
                Ok(ProcessedDocument {
                    id: row.get(0)?,
                    source_id: row.get(1)?,
                    source_content_id: row.get(2)?,
                    document_type: DocumentType::from_db_string(&doc_type)
                        .unwrap_or(DocumentType::Article),
                    title: row.get(4)?,
                    content: row.get(5)?,
                    summary: row.get(6)?,
                    keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
                    embedding: embedding_json
                        .and_then(|json| serde_json::from_str(&json).ok()),
                    processed_at: parse_timestamp(&processed_at),
                })
            })
            .optional()?;

        Ok(doc)
    }
}
