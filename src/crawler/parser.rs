//! HTML page parser
//!
//! Converts a fetched HTML body into a structured page record:
//! - Title and cleaned content text, driven by the source's selector lists
//!   with generic fallbacks (`title`, `body`)
//! - Outbound links, normalized and deduplicated within the page
//! - Attachment (PDF) links, collected separately and never crawled
//! - Optional publish date
//! - A content hash over the cleaned text, used for deduplication
//!
//! Noise elements (scripts, styles, navigation, cookie banners) are skipped
//! during text collection, so they pollute neither the title nor the content.

use crate::config::SelectorConfig;
use crate::url::{normalize_url, UrlFilter};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Cleaned content is truncated to this many characters
const MAX_CONTENT_CHARS: usize = 50_000;

/// Element names whose subtrees never contain document text
const NOISE_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "menu", "aside", "noscript", "iframe",
];

/// Class/id substrings marking boilerplate containers
const NOISE_MARKERS: &[&str] = &["cookie", "menu", "banner"];

/// Date formats tried in order against the extracted date text
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];

/// Structured result of parsing one page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// URL the page was fetched from
    pub source_url: Url,

    /// Extracted title; empty when no selector matched
    pub title: String,

    /// Cleaned text, whitespace-collapsed, capped at 50,000 characters
    pub content: String,

    /// Crawlable outbound links, deduplicated within the page
    pub links: Vec<Url>,

    /// Attachment links; may be off-origin, recorded but never crawled
    pub pdf_links: Vec<String>,

    /// Publish date when a date selector matched and parsed
    pub publish_date: Option<NaiveDate>,

    /// Non-cryptographic hash of `content`, hex-encoded
    pub content_hash: String,
}

/// Parses an HTML body into a [`ParsedPage`]
///
/// Configured selectors are tried in order; generic fallbacks keep the parser
/// useful on sources with no selector configuration at all. Extraction never
/// fails: a page where nothing matches parses to empty fields.
pub fn parse_page(html: &str, source_url: &Url, selectors: &SelectorConfig) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document, &selectors.title);
    let content = extract_content(&document, &selectors.content);
    let (links, pdf_links) = extract_links(&document, source_url, selectors);
    let publish_date = extract_date(&document, &selectors.date);
    let content_hash = content_hash(&content);

    ParsedPage {
        source_url: source_url.clone(),
        title,
        content,
        links,
        pdf_links,
        publish_date,
        content_hash,
    }
}

/// Computes the dedup hash over cleaned content
///
/// xxh3 is deterministic and collision-tolerant; the hash only detects
/// unchanged content on re-crawl and has no security role.
pub fn content_hash(content: &str) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(content.as_bytes()))
}

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!("Ignoring unparsable selector {raw:?}: {e:?}");
            None
        }
    }
}

fn is_noise(element: ElementRef) -> bool {
    let name = element.value().name();
    if NOISE_ELEMENTS.contains(&name) {
        return true;
    }

    for attr in ["class", "id"] {
        if let Some(value) = element.value().attr(attr) {
            let value = value.to_lowercase();
            if NOISE_MARKERS.iter().any(|m| value.contains(m)) {
                return true;
            }
        }
    }

    false
}

/// Collects text from an element's subtree, skipping noise elements
fn collect_text(element: ElementRef, out: &mut String) {
    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child) = ElementRef::wrap(node) {
            if !is_noise(child) {
                collect_text(child, out);
            }
        }
    }
}

/// Text of one element with internal whitespace collapsed to single spaces
fn clean_element_text(element: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_title(document: &Html, configured: &[String]) -> String {
    // Configured selectors, then the generic title element, then empty
    let strategies = configured.iter().map(String::as_str).chain(["title"]);

    for raw in strategies {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = clean_element_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }

    String::new()
}

fn extract_content(document: &Html, configured: &[String]) -> String {
    let strategies = configured.iter().map(String::as_str).chain(["body"]);

    for raw in strategies {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };

        // Blocks joined by blank lines, per matching element
        let blocks: Vec<String> = document
            .select(&selector)
            .map(clean_element_text)
            .filter(|text| !text.is_empty())
            .collect();

        if !blocks.is_empty() {
            return truncate_chars(&blocks.join("\n\n"), MAX_CONTENT_CHARS);
        }
    }

    String::new()
}

fn extract_links(
    document: &Html,
    source_url: &Url,
    selectors: &SelectorConfig,
) -> (Vec<Url>, Vec<String>) {
    let mut links = Vec::new();
    let mut pdf_links = Vec::new();
    let mut seen_links: HashSet<Url> = HashSet::new();
    let mut seen_pdfs: HashSet<String> = HashSet::new();

    let link_selectors: Vec<&str> = if selectors.links.is_empty() {
        vec!["a[href]"]
    } else {
        selectors.links.iter().map(String::as_str).collect()
    };

    for raw in link_selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(url) = normalize_url(href, source_url) else {
                continue;
            };

            if UrlFilter::is_pdf_link(url.as_str()) {
                if seen_pdfs.insert(url.to_string()) {
                    pdf_links.push(url.to_string());
                }
            } else if seen_links.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    // Extra attachment selectors feed pdf_links directly
    for raw in &selectors.pdf_links {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Ok(url) = normalize_url(href, source_url) {
                if seen_pdfs.insert(url.to_string()) {
                    pdf_links.push(url.to_string());
                }
            }
        }
    }

    (links, pdf_links)
}

fn extract_date(document: &Html, configured: &[String]) -> Option<NaiveDate> {
    for raw in configured {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = clean_element_text(element);
            if text.is_empty() {
                continue;
            }
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
                    return Some(date);
                }
            }
            // Unparsable date text yields no date, never an error
            debug!("Date text {text:?} matched no known format");
        }
    }
    None
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
