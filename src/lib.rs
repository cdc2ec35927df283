//! Civicrawl: a crawl-and-ingest pipeline for public-sector document portals
//!
//! This crate crawls web sources that expose no structured API (municipal
//! portals, public-information bulletins, legal portals), extracts candidate
//! documents, deduplicates them by content hash, classifies them by document
//! type, and optionally enriches them with a summary and an embedding before
//! handing them to a downstream content store.
//!
//! One crawl job is a bounded, sequential loop over a single source: the
//! frontier pops the next URL, the fetcher retrieves it under politeness
//! constraints, the parser turns it into a cleaned page record, the
//! deduplicator persists it on first sight, and the classifier/enricher
//! produce the processed document. Job invocation is the caller's
//! responsibility; there is no CLI surface.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod enrich;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for ingest pipeline operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// This is the only fatal error class: a job aborts before any fetch if its
/// source configuration cannot be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for ingest pipeline operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{classify, extract_keywords, DocumentType};
pub use config::{ConfigProvider, SourceConfig};
pub use crawler::{CrawlJob, CrawlJobResult};
pub use store::{ContentStore, JobLogSink, ProcessedDocument, StoredContentRecord};
