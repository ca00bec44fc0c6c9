//! Evidence context assembly.

use crate::rag::types::SearchHit;

/// Render ranked hits into the evidence block handed to the model.
///
/// Returns `None` for an empty list: "no evidence" is never an empty string.
/// Each hit becomes a labeled section numbered by rank, in input order.
pub fn assemble(hits: &[SearchHit]) -> Option<String> {
    if hits.is_empty() {
        return None;
    }

    let sections: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "[Source {}] Title: {}\nContent: {}\n---",
                i + 1,
                hit.payload.display_title(),
                hit.payload.content
            )
        })
        .collect();

    Some(sections.join("\n\n"))
}
