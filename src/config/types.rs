use serde::Deserialize;

/// Per-source crawl configuration
///
/// A `SourceConfig` describes one crawlable source: where to start, how far
/// to go, how politely to behave, and how to extract document fields from its
/// pages. It is immutable for the duration of one job.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier for this source (scopes dedup and storage)
    #[serde(rename = "source-id")]
    pub source_id: String,

    /// Human-readable source name
    pub name: String,

    /// URL the crawl starts from; also defines the crawl origin
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of accepted documents per job
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum link depth from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Politeness delay between fetches (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// CSS selectors for field extraction
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Include/exclude URL substring patterns
    #[serde(rename = "url-patterns", default)]
    pub url_patterns: UrlPatterns,
}

/// CSS selectors used by the page parser
///
/// Each field is an ordered list of selectors tried in sequence until one
/// yields non-empty output. The parser appends its own generic fallbacks
/// (`title`, `body`) after the configured entries, so an empty list is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectorConfig {
    /// Selectors for the document title
    #[serde(default)]
    pub title: Vec<String>,

    /// Selectors for the main content blocks
    #[serde(default)]
    pub content: Vec<String>,

    /// Selectors for the publish date text
    #[serde(default)]
    pub date: Vec<String>,

    /// Selectors for outbound links (defaults to `a[href]`)
    #[serde(default)]
    pub links: Vec<String>,

    /// Selectors for attachment links (defaults to PDF-suffixed hrefs)
    #[serde(rename = "pdf-links", default)]
    pub pdf_links: Vec<String>,
}

/// URL substring patterns controlling frontier placement and filtering
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlPatterns {
    /// URLs containing any of these substrings are tagged priority.
    /// Advisory only: non-matching URLs are still crawled, later.
    #[serde(default)]
    pub include: Vec<String>,

    /// URLs containing any of these substrings (case-insensitive) are
    /// rejected outright.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_max_pages() -> u32 {
    20
}

fn default_max_depth() -> u32 {
    2
}

fn default_delay_ms() -> u64 {
    1000
}

impl SourceConfig {
    /// Creates a minimal config for a source, with default bounds
    pub fn new(source_id: &str, name: &str, seed_url: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            name: name.to_string(),
            seed_url: seed_url.to_string(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            delay_ms: default_delay_ms(),
            selectors: SelectorConfig::default(),
            url_patterns: UrlPatterns::default(),
        }
    }
}
