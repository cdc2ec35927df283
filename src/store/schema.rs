//! Database schema definitions
//!
//! All SQL schema definitions for the civicrawl SQLite backend.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Raw fetched content, one row per (source_id, content_hash)
CREATE TABLE IF NOT EXISTS content_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    raw_content TEXT NOT NULL,
    pdf_links TEXT NOT NULL DEFAULT '[]',
    fetched_at TEXT NOT NULL,
    UNIQUE(source_id, content_hash)
);

CREATE INDEX IF NOT EXISTS idx_content_source_hash
    ON content_records(source_id, content_hash);

-- Classified/enriched documents, at most one per raw record
CREATE TABLE IF NOT EXISTS processed_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL,
    source_content_id INTEGER NOT NULL REFERENCES content_records(id),
    document_type TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    summary TEXT,
    keywords TEXT NOT NULL DEFAULT '[]',
    embedding TEXT,
    processed_at TEXT NOT NULL,
    UNIQUE(source_content_id)
);

CREATE INDEX IF NOT EXISTS idx_processed_source
    ON processed_documents(source_id);

-- Last successful crawl per source
CREATE TABLE IF NOT EXISTS crawled_sources (
    source_id TEXT PRIMARY KEY,
    last_crawled_at TEXT NOT NULL
);

-- One row per crawl job run
CREATE TABLE IF NOT EXISTS job_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    success INTEGER,
    items_scraped INTEGER,
    items_processed INTEGER,
    errors TEXT
);

CREATE INDEX IF NOT EXISTS idx_job_logs_source ON job_logs(source_id);
"#;

/// Initializes the database schema on a connection
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
