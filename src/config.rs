use std::env;

/// Tuning knobs shared by the resolver and the retrieval orchestrator.
///
/// The similarity floors are deliberately configuration, not constants:
/// acceptable values depend on the embedding model the host wires in.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Result count requested from vector search when the policy does not
    /// specify one.
    pub default_top_n: usize,
    /// Upper bound on rewritten sub-queries per message.
    pub max_subqueries: usize,
    /// Minimum cosine similarity for a capability embedding match.
    pub embedding_match_floor: f32,
    /// Minimum token-overlap ratio for the keyword fallback match.
    pub overlap_match_floor: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_subqueries: 3,
            embedding_match_floor: 0.55,
            overlap_match_floor: 0.25,
        }
    }
}

impl RetrievalConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Recognized variables: `CONTEXTOR_TOP_N`, `CONTEXTOR_MAX_SUBQUERIES`,
    /// `CONTEXTOR_EMBEDDING_FLOOR`, `CONTEXTOR_OVERLAP_FLOOR`.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            default_top_n: env::var("CONTEXTOR_TOP_N")
                .map(|s| s.parse())
                .unwrap_or(Ok(defaults.default_top_n))?,
            max_subqueries: env::var("CONTEXTOR_MAX_SUBQUERIES")
                .map(|s| s.parse())
                .unwrap_or(Ok(defaults.max_subqueries))?,
            embedding_match_floor: env::var("CONTEXTOR_EMBEDDING_FLOOR")
                .map(|s| s.parse())
                .unwrap_or(Ok(defaults.embedding_match_floor))?,
            overlap_match_floor: env::var("CONTEXTOR_OVERLAP_FLOOR")
                .map(|s| s.parse())
                .unwrap_or(Ok(defaults.overlap_match_floor))?,
        })
    }
}
