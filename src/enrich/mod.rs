//! Document enrichment
//!
//! Optional, best-effort AI enrichment of accepted documents:
//! - [`Summarizer`] produces a short summary when the content is long enough
//! - [`Embedder`] produces a vector embedding over title and content
//!
//! Both collaborators are optional and both calls are failure-isolated. An
//! enrichment failure is logged and leaves the corresponding field empty; it
//! never becomes a job error and never blocks persistence of the document.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Content shorter than this is not worth summarizing
const SUMMARY_MIN_CONTENT: usize = 500;

/// How much content is sent to the summarizer
const SUMMARY_INPUT_CAP: usize = 3000;

/// How much of title + content is sent to the embedder
const EMBED_INPUT_CAP: usize = 5000;

/// Best-effort text summarization service
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes the given text. May return `None` when the provider
    /// declines to produce a summary.
    async fn summarize(&self, text: &str) -> anyhow::Result<Option<String>>;
}

/// Best-effort text embedding service
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Produces a vector embedding for the given text.
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// The outcome of enriching one document. Either field may be absent.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub summary: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

/// Orchestrates the optional enrichment collaborators for one document
///
/// Calls are issued sequentially per document to bound concurrent load on
/// the provider. Failures are logged and degrade to absent fields.
pub struct Enricher {
    summarizer: Option<Arc<dyn Summarizer>>,
    embedder: Option<Arc<dyn Embedder>>,
}

impl Enricher {
    pub fn new(
        summarizer: Option<Arc<dyn Summarizer>>,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> Self {
        Self {
            summarizer,
            embedder,
        }
    }

    /// An enricher with no collaborators; every document enriches to empty
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Enriches one document, isolating collaborator failures
    pub async fn enrich(&self, title: &str, content: &str) -> Enrichment {
        let summary = self.summarize(content).await;
        let embedding = self.embed(title, content).await;
        Enrichment { summary, embedding }
    }

    async fn summarize(&self, content: &str) -> Option<String> {
        let summarizer = self.summarizer.as_ref()?;

        if content.chars().count() <= SUMMARY_MIN_CONTENT {
            debug!("Content too short to summarize, skipping");
            return None;
        }

        let input = truncate_chars(content, SUMMARY_INPUT_CAP);
        match summarizer.summarize(input).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summarization failed: {e:#}");
                None
            }
        }
    }

    async fn embed(&self, title: &str, content: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;

        let combined = format!("{}\n{}", title, content);
        let input = truncate_chars(&combined, EMBED_INPUT_CAP);
        match embedder.embed(input).await {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                warn!("Embedding failed: {e:#}");
                None
            }
        }
    }
}

/// Truncates a string to at most `max` characters on a char boundary
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
