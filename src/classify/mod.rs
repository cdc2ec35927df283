//! Document classification and keyword extraction
//!
//! Rule-based classification for public-sector documents:
//! - [`classify`] assigns a [`DocumentType`] by evaluating a fixed rule table
//!   against the title and the leading portion of the content. Rules are
//!   checked in priority order; the first match wins and the fallback is
//!   always [`DocumentType::Article`]. Classification never fails.
//! - [`extract_keywords`] scans a fixed domain vocabulary against title and
//!   content, preserving vocabulary order, capped at 10 terms.

use serde::{Deserialize, Serialize};

/// How much of the content participates in type classification
const CLASSIFY_CONTENT_PREFIX: usize = 1000;

/// Maximum number of keywords attached to a document
const MAX_KEYWORDS: usize = 10;

/// The type assigned to a processed document
///
/// Closed set; [`classify`] always returns one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// A council or board resolution
    Resolution,
    /// Minutes or protocol of a session
    Protocol,
    /// An official announcement or notice
    Announcement,
    /// A statute, ordinance, regulation, or decree
    LegalAct,
    /// A news item or press release
    News,
    /// Anything that matched no rule
    Article,
}

impl DocumentType {
    /// Converts the type to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            DocumentType::Resolution => "resolution",
            DocumentType::Protocol => "protocol",
            DocumentType::Announcement => "announcement",
            DocumentType::LegalAct => "legal_act",
            DocumentType::News => "news",
            DocumentType::Article => "article",
        }
    }

    /// Parses the type from its database string representation
    pub fn from_db_string(s: &str) -> Option<DocumentType> {
        match s {
            "resolution" => Some(DocumentType::Resolution),
            "protocol" => Some(DocumentType::Protocol),
            "announcement" => Some(DocumentType::Announcement),
            "legal_act" => Some(DocumentType::LegalAct),
            "news" => Some(DocumentType::News),
            "article" => Some(DocumentType::Article),
            _ => None,
        }
    }
}

/// Rule table, evaluated top to bottom. Earlier rows outrank later ones, so
/// a protocol that mentions a resolution still classifies as a resolution
/// only if the resolution terms appear; order encodes that priority.
const CLASSIFICATION_RULES: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::Resolution,
        &["resolution", "resolved that", "res. no"],
    ),
    (
        DocumentType::Protocol,
        &["protocol", "minutes of", "session minutes"],
    ),
    (
        DocumentType::LegalAct,
        &["ordinance", "regulation", "decree", "statute", "legal act"],
    ),
    (
        DocumentType::Announcement,
        &["announcement", "notice", "public consultation", "tender"],
    ),
    (
        DocumentType::News,
        &["news", "press release", "published on"],
    ),
];

/// Fixed keyword vocabulary, in extraction order
const KEYWORD_VOCABULARY: &[&str] = &[
    "resolution",
    "protocol",
    "announcement",
    "ordinance",
    "regulation",
    "decree",
    "session",
    "council",
    "committee",
    "budget",
    "tender",
    "procurement",
    "consultation",
    "zoning",
    "permit",
    "tax",
    "subsidy",
    "election",
    "environment",
    "infrastructure",
];

/// Classifies a document by title and content
///
/// Rules are matched against the lower-cased title and the first
/// 1000 characters of the content. Falls back to [`DocumentType::Article`]
/// when nothing matches, so every input classifies to some value.
pub fn classify(title: &str, content: &str) -> DocumentType {
    let title = title.to_lowercase();
    let content_prefix: String = content
        .chars()
        .take(CLASSIFY_CONTENT_PREFIX)
        .collect::<String>()
        .to_lowercase();

    for (doc_type, terms) in CLASSIFICATION_RULES {
        for term in *terms {
            if title.contains(term) || content_prefix.contains(term) {
                return *doc_type;
            }
        }
    }

    DocumentType::Article
}

/// Extracts keywords from a document
///
/// Scans the fixed vocabulary against the lower-cased title and content.
/// The result preserves vocabulary order and holds at most 10 terms, so the
/// same input always yields the same keyword list.
pub fn extract_keywords(title: &str, content: &str) -> Vec<String> {
    let haystack = format!("{} {}", title, content).to_lowercase();

    KEYWORD_VOCABULARY
        .iter()
        .filter(|term| haystack.contains(*term))
        .take(MAX_KEYWORDS)
        .map(|term| term.to_string())
        .collect()
}
