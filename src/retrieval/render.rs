//! Renders retrieval results into the plain-text context block injected
//! into the model's instructions (or returned as a tool result).
//!
//! The exact shape matters for the model's citation behavior: every entry
//! is labeled `[doc:N]` and the trailing `References:` section maps each
//! distinct reference identity to its number exactly once.

use crate::retrieval::types::{ReferenceIndex, RetrievalResult};

const HEADER: &str = "Retrieved content relevant to the user's request:";

const BASE_INSTRUCTION: &str = "Use the retrieved content below to answer, without mentioning \
the retrieval process. Cite supporting entries by their [doc:N] label.";

const IN_SCOPE_INSTRUCTION: &str = "Answer only from the retrieved content. If the answer is \
not contained in it, say that the information is not available in the source.";

/// Fixed instruction emitted when in-scope retrieval finds nothing. No
/// citations section: there is nothing to cite.
pub const NOT_IN_SOURCE_BLOCK: &str = "No relevant content was found in the configured source \
for this request. Tell the user the information is not available in the source; do not answer \
from general knowledge.";

/// Render the final, deduplicated, thresholded result list for one
/// response. Citation numbers are assigned in first-seen order and repeat
/// for repeated references.
pub fn render_context_block(results: &[RetrievalResult], in_scope: bool) -> String {
    let mut references = ReferenceIndex::new();
    let mut block = String::new();

    block.push_str(HEADER);
    block.push_str("\n\n");
    block.push_str(BASE_INSTRUCTION);
    if in_scope {
        block.push(' ');
        block.push_str(IN_SCOPE_INSTRUCTION);
    }
    block.push('\n');

    for result in results {
        let n = references.assign(&result.reference_id);
        block.push_str("\n---\n");
        if let Some(title) = result.title.as_deref().filter(|t| !t.trim().is_empty()) {
            block.push_str(&format!("[doc:{}] {}\n", n, title));
        }
        block.push_str(&format!("[doc:{}] {}\n", n, result.text));
    }

    block.push_str("\nReferences:\n");
    for (n, reference_id) in references.entries() {
        block.push_str(&format!("[{}] {}\n", n, reference_id));
    }

    block
}
