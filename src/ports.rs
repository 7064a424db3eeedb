//! Collaborator contracts consumed by the retrieval core.
//!
//! These are implemented by the host (embedding provider client, vector
//! store client, filter engine, chat-completion client); the core only
//! depends on the trait surface so every pipeline is testable with mocks.

use crate::error::Result;
use crate::retrieval::types::RetrievalResult;
use async_trait::async_trait;

/// Batched text embedding: one output per input, `None` for a per-item
/// failure (the batch itself still succeeds).
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>>;
}

/// Ranked nearest-neighbor search over a named embedding index, restricted
/// to one source identity and optionally to an allow-list of reference ids.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn search(
        &self,
        index_name: &str,
        query_vector: &[f32],
        source_id: &str,
        top_n: usize,
        allowed_refs: Option<&[String]>,
    ) -> Result<Vec<RetrievalResult>>;
}

/// Resolves an attribute filter expression to the set of reference ids it
/// admits. `Ok(None)` means "no filter capability available", which is
/// distinct from `Ok(Some(vec![]))`, a valid filter matching nothing.
#[async_trait]
pub trait FilterExecutor: Send + Sync {
    async fn resolve(&self, index_name: &str, filter_expr: &str) -> Result<Option<Vec<String>>>;
}

/// Lightweight completion call, used only for query rewriting.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String>;
}
