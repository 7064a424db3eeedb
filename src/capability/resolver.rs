//! Picks the capability best matching a free-text request.
//!
//! Primary signal is cosine similarity against the cached capability
//! embeddings. When nothing clears the embedding floor the resolver falls
//! back to stemmed-token overlap against the live capability lists. That is cheap,
//! and it catches capabilities added after the embeddings were cached as
//! well as phrasings the embedding model under-weights.

use crate::capability::cache::CapabilityEmbeddingCache;
use crate::capability::types::{CapabilityKind, CapabilityOwner};
use crate::config::RetrievalConfig;
use crate::math::cosine_similarity;
use crate::ports::EmbeddingGenerator;
use crate::tokenize::{overlap_ratio, token_set};
use std::sync::Arc;

/// Which signal produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSignal {
    Embedding,
    TokenOverlap,
}

/// The selected capability, with enough context to route an invocation.
#[derive(Debug, Clone)]
pub struct CapabilityMatch {
    pub owner_id: String,
    pub owner_name: String,
    pub kind: CapabilityKind,
    pub name: String,
    /// Stable routing identity: the URI for resources that carry one, the
    /// name otherwise.
    pub identity: String,
    pub score: f32,
    pub signal: MatchSignal,
}

pub struct CapabilityResolver {
    embedder: Arc<dyn EmbeddingGenerator>,
    cache: Arc<CapabilityEmbeddingCache>,
    config: RetrievalConfig,
}

impl CapabilityResolver {
    pub fn new(
        embedder: Arc<dyn EmbeddingGenerator>,
        cache: Arc<CapabilityEmbeddingCache>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            cache,
            config,
        }
    }

    /// Resolve `query` to the single best capability across `owners`, or
    /// `None` when nothing clears either confidence floor. Embedding and
    /// cache failures degrade to the token-overlap fallback rather than
    /// surfacing an error.
    pub async fn resolve(
        &self,
        query: &str,
        owners: &[CapabilityOwner],
    ) -> Option<CapabilityMatch> {
        if query.trim().is_empty() || owners.is_empty() {
            return None;
        }

        if let Some(found) = self.resolve_by_embedding(query, owners).await {
            metrics::counter!("capability_resolutions_total", "signal" => "embedding").increment(1);
            return Some(found);
        }

        let fallback = self.resolve_by_overlap(query, owners);
        if fallback.is_some() {
            metrics::counter!("capability_resolutions_total", "signal" => "overlap").increment(1);
        }
        fallback
    }

    async fn resolve_by_embedding(
        &self,
        query: &str,
        owners: &[CapabilityOwner],
    ) -> Option<CapabilityMatch> {
        let entries = match self.cache.get_or_create(owners, self.embedder.as_ref()).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Capability embedding cache unavailable, falling back to token overlap");
                return None;
            }
        };
        if entries.is_empty() {
            return None;
        }

        let query_vector = match self.embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) => vectors.pop().flatten()?,
            Err(e) => {
                tracing::warn!(error = %e, "Query embedding failed, falling back to token overlap");
                return None;
            }
        };

        // First-seen entry wins on an exact score tie.
        let mut best: Option<(&crate::capability::types::CapabilityEmbedding, f32)> = None;
        for entry in &entries {
            let score = cosine_similarity(&query_vector, &entry.vector);
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((entry, score));
            }
        }

        let (entry, score) = best?;
        tracing::debug!(
            capability = %entry.name,
            owner = %entry.owner_id,
            score,
            floor = self.config.embedding_match_floor,
            "Best capability embedding match"
        );

        if score < self.config.embedding_match_floor {
            return None;
        }

        Some(CapabilityMatch {
            owner_id: entry.owner_id.clone(),
            owner_name: entry.owner_name.clone(),
            kind: entry.kind,
            name: entry.name.clone(),
            identity: entry.identity.clone(),
            score,
            signal: MatchSignal::Embedding,
        })
    }

    fn resolve_by_overlap(&self, query: &str, owners: &[CapabilityOwner]) -> Option<CapabilityMatch> {
        let query_tokens = token_set(query);
        if query_tokens.is_empty() {
            return None;
        }

        let mut best: Option<CapabilityMatch> = None;
        for owner in owners {
            for capability in owner.valid_capabilities() {
                let candidate_tokens =
                    token_set(&format!("{} {}", capability.name, capability.description));
                let ratio = overlap_ratio(&query_tokens, &candidate_tokens);

                if best.as_ref().map(|b| ratio > b.score).unwrap_or(true) {
                    best = Some(CapabilityMatch {
                        owner_id: owner.id.clone(),
                        owner_name: owner.display_name.clone(),
                        kind: capability.kind,
                        name: capability.name.clone(),
                        identity: capability.identity().to_string(),
                        score: ratio,
                        signal: MatchSignal::TokenOverlap,
                    });
                }
            }
        }

        let best = best?;
        if best.score < self.config.overlap_match_floor {
            return None;
        }

        tracing::debug!(
            capability = %best.name,
            owner = %best.owner_id,
            score = best.score,
            "Capability matched by token overlap"
        );

        Some(best)
    }
}
