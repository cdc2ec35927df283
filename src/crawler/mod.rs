//! Crawl pipeline
//!
//! Everything between a seed URL and a persisted document:
//! - [`fetcher`]: one bounded HTTP GET per URL, outcome classification
//! - [`parser`]: HTML to structured page record
//! - [`frontier`]: two-tier queue with visited set and crawl bounds
//! - [`dedup`]: content-hash check-and-record against the store
//! - [`job`]: the controller wiring it all into one sequential run

pub mod dedup;
pub mod fetcher;
pub mod frontier;
pub mod job;
pub mod parser;

pub use dedup::{check_and_record, DedupOutcome};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use frontier::{Frontier, FrontierEntry, FrontierTier};
pub use job::{CrawlJob, CrawlJobResult};
pub use parser::{parse_page, ParsedPage};
