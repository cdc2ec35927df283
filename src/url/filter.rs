//! Link filtering and frontier-tier tagging
//!
//! After normalization every candidate link is checked against the job's
//! origin, a binary-asset extension denylist, and the source's exclude
//! patterns. Surviving links are tagged for the priority or normal frontier
//! tier based on the include patterns.

use crate::config::UrlPatterns;
use url::{Origin, Url};

/// File extensions that never lead to crawlable documents
///
/// Images, stylesheets, scripts, fonts and archives; matched
/// case-insensitively against the end of the URL path.
const SKIP_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico", ".bmp", ".css", ".js", ".mjs",
    ".woff", ".woff2", ".ttf", ".otf", ".eot", ".zip", ".rar", ".7z", ".gz",
];

/// Where a link belongs after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Crawl, ahead of normal-tier links (matched an include pattern)
    Priority,

    /// Crawl in discovery order
    Normal,

    /// Do not crawl (off-origin, binary asset, or excluded)
    Rejected,
}

/// Validates candidate links against one job's crawl scope
///
/// Built once per job from the seed URL and the source's URL patterns.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    origin: Origin,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl UrlFilter {
    /// Creates a filter scoped to the seed's origin (`scheme://host`)
    pub fn new(seed: &Url, patterns: &UrlPatterns) -> Self {
        Self {
            origin: seed.origin(),
            include: patterns
                .include
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            exclude: patterns
                .exclude
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Decides whether and how a normalized URL enters the frontier
    ///
    /// Rejects off-origin URLs (same-origin crawl only), binary-asset paths,
    /// and URLs matching any exclude substring (case-insensitive). URLs
    /// matching an include substring are tagged [`LinkDecision::Priority`];
    /// this is advisory, not exclusive.
    pub fn classify(&self, url: &Url) -> LinkDecision {
        if url.origin() != self.origin {
            return LinkDecision::Rejected;
        }

        let path = url.path().to_lowercase();
        if SKIP_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return LinkDecision::Rejected;
        }

        let url_lower = url.as_str().to_lowercase();
        if self.exclude.iter().any(|p| url_lower.contains(p)) {
            return LinkDecision::Rejected;
        }

        if self.include.iter().any(|p| url_lower.contains(p)) {
            LinkDecision::Priority
        } else {
            LinkDecision::Normal
        }
    }

    /// Returns true if the URL ends in a PDF suffix or matches a PDF path hint
    ///
    /// Attachments are recorded, not crawled, and may live off-origin, so this
    /// check is independent of [`classify`](Self::classify).
    pub fn is_pdf_link(url_or_href: &str) -> bool {
        let lower = url_or_href.to_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or(&lower);
        path.ends_with(".pdf") || lower.contains("/pdf/") || lower.contains("format=pdf")
    }
}
