use serde::{Deserialize, Serialize};

/// Highest strictness level; strictness maps to a similarity floor of
/// `strictness / 5`.
pub const MAX_STRICTNESS: u8 = 5;

/// Per-invocation retrieval policy, supplied by the host's profile or
/// session layer. Read-only to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagPolicy {
    /// Number of results to request from vector search.
    pub top_n: usize,
    /// Relevance strictness, 0 (keep everything) to 5 (near-exact only).
    pub strictness: u8,
    /// When true, an empty result set must produce an explicit
    /// "not answerable from source" instruction instead of silence.
    pub in_scope: bool,
    /// Optional attribute filter expression, resolved by the host's
    /// filter executor before vector search.
    #[serde(default)]
    pub attribute_filter: Option<String>,
}

impl Default for RagPolicy {
    fn default() -> Self {
        Self {
            top_n: 5,
            strictness: 0,
            in_scope: false,
            attribute_filter: None,
        }
    }
}

impl RagPolicy {
    /// Minimum score a result must meet to survive thresholding.
    pub fn strictness_floor(&self) -> f32 {
        f32::from(self.strictness.min(MAX_STRICTNESS)) / f32::from(MAX_STRICTNESS)
    }
}
