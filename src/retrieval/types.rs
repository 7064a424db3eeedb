//! Type definitions for the retrieval pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One ranked hit from vector search.
///
/// `reference_id` is the stable identity of the original content item
/// (e.g. a source-document id), independent of which sub-query surfaced
/// the chunk. Results are transient per query and never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Stable content identity used for citation numbering and dedup.
    pub reference_id: String,

    /// Sub-chunk index within the reference, when the source is chunked.
    #[serde(default)]
    pub chunk_index: Option<u32>,

    /// Human-readable title, when the source provides one.
    #[serde(default)]
    pub title: Option<String>,

    /// The retrieved text.
    pub text: String,

    /// Relevance score in [0, 1] after normalization.
    pub score: f32,

    /// Source-specific metadata, passed through untouched.
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl RetrievalResult {
    /// Dedup key: two hits are the same chunk when both the reference and
    /// the chunk index match.
    pub fn dedup_key(&self) -> (String, Option<u32>) {
        (self.reference_id.clone(), self.chunk_index)
    }
}

/// The configured content source a retrieval operates against: the source
/// identity vector search is restricted to, plus its target embedding index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBinding {
    pub source_id: String,
    pub index_name: String,
}

/// Per-response map from reference identity to a 1-based citation number.
///
/// Numbers are assigned in first-seen order and stay stable for the whole
/// response, so the same reference renders with the same `[doc:N]` label
/// everywhere it appears. Never reused across orchestrator invocations.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    by_reference: HashMap<String, usize>,
    order: Vec<String>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the citation number for a reference, assigning the next
    /// number on first sight.
    pub fn assign(&mut self, reference_id: &str) -> usize {
        if let Some(&n) = self.by_reference.get(reference_id) {
            return n;
        }
        let n = self.order.len() + 1;
        self.by_reference.insert(reference_id.to_string(), n);
        self.order.push(reference_id.to_string());
        n
    }

    /// Distinct references in assignment order, paired with their numbers.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, id)| (i + 1, id.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_index_is_first_seen_and_stable() {
        let mut index = ReferenceIndex::new();
        assert_eq!(index.assign("A"), 1);
        assert_eq!(index.assign("B"), 2);
        assert_eq!(index.assign("A"), 1);

        let entries: Vec<(usize, &str)> = index.entries().collect();
        assert_eq!(entries, vec![(1, "A"), (2, "B")]);
    }

    #[test]
    fn dedup_key_distinguishes_chunks() {
        let mut result = RetrievalResult {
            reference_id: "doc".into(),
            chunk_index: Some(0),
            title: None,
            text: "text".into(),
            score: 0.5,
            metadata: None,
        };
        let first = result.dedup_key();
        result.chunk_index = Some(1);
        assert_ne!(first, result.dedup_key());
    }
}
