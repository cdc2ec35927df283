//! Content deduplication
//!
//! Checks a parsed page's content hash against the store, scoped to the
//! source, and records it on first sight. A page whose hash was already seen
//! is never re-persisted and never re-classified.

use crate::crawler::ParsedPage;
use crate::store::{ContentStore, NewContentRecord, StoreResult, StoredContentRecord};

/// Result of the check-and-record step for one page
#[derive(Debug)]
pub struct DedupOutcome {
    /// True if the content hash was not seen before on this source
    pub is_new: bool,

    /// The stored record, existing or freshly inserted
    pub record: StoredContentRecord,
}

/// Looks up the page's content hash and records the page if it is new
///
/// Check-then-insert is one logical step per document. Jobs are sequential
/// within a source and concurrent jobs never share a `source_id`, so the two
/// store calls cannot race.
pub fn check_and_record<S: ContentStore + ?Sized>(
    store: &mut S,
    source_id: &str,
    page: &ParsedPage,
) -> StoreResult<DedupOutcome> {
    if let Some(existing) = store.find_by_hash(source_id, &page.content_hash)? {
        return Ok(DedupOutcome {
            is_new: false,
            record: existing,
        });
    }

    let record = store.insert_raw(NewContentRecord {
        source_id: source_id.to_string(),
        url: page.source_url.to_string(),
        title: page.title.clone(),
        content_hash: page.content_hash.clone(),
        raw_content: page.content.clone(),
        pdf_links: page.pdf_links.clone(),
    })?;

    Ok(DedupOutcome {
        is_new: true,
        record,
    })
}
