//! Source deduplication for citations.

use crate::rag::types::{SearchHit, SourceRef};
use std::collections::HashSet;

/// Collapse ranked hits into at most `max` unique cited works.
///
/// Works are identified by `record_id`; the first (best ranked) passage of
/// each work wins. Collection stops as soon as `max` works are found.
pub fn extract_sources(hits: &[SearchHit], max: usize) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for hit in hits {
        if sources.len() >= max {
            break;
        }
        if seen.insert(hit.payload.record_id.as_str()) {
            sources.push(SourceRef::from(&hit.payload));
        }
    }

    sources
}
