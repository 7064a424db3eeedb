//! Model-invokable retrieval action.
//!
//! The model calls this mid-conversation with a `query` argument to repeat
//! retrieval on demand. Every outcome, including missing configuration,
//! comes back as plain text so the model can recover conversationally;
//! `invoke` never returns an error.

use crate::config::RetrievalConfig;
use crate::policy::RagPolicy;
use crate::ports::{EmbeddingGenerator, FilterExecutor, VectorSearch};
use crate::retrieval::orchestrator::apply_strictness;
use crate::retrieval::render::render_context_block;
use crate::retrieval::types::SourceBinding;
use std::sync::Arc;

/// Argument name and description, for hosts registering the tool with a
/// model's function-calling surface.
pub const TOOL_NAME: &str = "search_source";
pub const TOOL_DESCRIPTION: &str =
    "Search the configured content source for passages relevant to a query.";

/// The active execution context the tool resolves before searching.
/// Assembled by the host per turn; any missing link produces a
/// conversational explanation instead of a search.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    pub source: Option<SourceBinding>,
    pub policy: RagPolicy,
}

pub struct OnDemandRetrievalTool {
    embedder: Arc<dyn EmbeddingGenerator>,
    search: Arc<dyn VectorSearch>,
    filter: Option<Arc<dyn FilterExecutor>>,
    config: RetrievalConfig,
}

impl OnDemandRetrievalTool {
    pub fn new(
        embedder: Arc<dyn EmbeddingGenerator>,
        search: Arc<dyn VectorSearch>,
        filter: Option<Arc<dyn FilterExecutor>>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            search,
            filter,
            config,
        }
    }

    /// Run a retrieval for `query` in the given execution context and
    /// return the tool result text.
    pub async fn invoke(&self, context: &ToolContext, query: &str) -> String {
        metrics::counter!("retrieval_tool_invocations_total").increment(1);

        if query.trim().is_empty() {
            return "The query argument was empty. Provide a short description of what to \
                    search for."
                .to_string();
        }

        let Some(source) = &context.source else {
            return "No content source is configured for this conversation, so there is \
                    nothing to search."
                .to_string();
        };
        if source.index_name.trim().is_empty() {
            return "The configured content source has no embedding index, so it cannot be \
                    searched."
                .to_string();
        }

        // Resolve the attribute filter before spending an embedding call:
        // an empty allow-list already answers the request.
        let allowed_refs = match self.resolve_filter(source, &context.policy).await {
            FilterOutcome::Unfiltered => None,
            FilterOutcome::Allowed(refs) => Some(refs),
            FilterOutcome::NoMatches => {
                return "No documents matched the configured filter, so the search returned \
                        nothing."
                    .to_string();
            }
        };

        let vector = match self.embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) => match vectors.pop().flatten() {
                Some(vector) => vector,
                None => {
                    tracing::warn!("Embedding generator returned no vector for tool query");
                    return "The search could not be performed because the query could not be \
                            embedded. Try rephrasing or answer without the source."
                        .to_string();
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Tool query embedding failed");
                return "The search could not be performed because the embedding service is \
                        unavailable."
                    .to_string();
            }
        };

        let top_n = if context.policy.top_n > 0 {
            context.policy.top_n
        } else {
            self.config.default_top_n
        };

        let results = match self
            .search
            .search(
                &source.index_name,
                &vector,
                &source.source_id,
                top_n,
                allowed_refs.as_deref(),
            )
            .await
        {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, index = %source.index_name, "Tool vector search failed");
                return "The search could not be performed because the search service is \
                        unavailable."
                    .to_string();
            }
        };

        let kept = apply_strictness(results, &context.policy);
        if kept.is_empty() {
            return "No relevant content was found in the source for this query.".to_string();
        }

        tracing::debug!(results = kept.len(), query, "On-demand retrieval returned results");
        render_context_block(&kept, context.policy.in_scope)
    }

    async fn resolve_filter(&self, source: &SourceBinding, policy: &RagPolicy) -> FilterOutcome {
        let Some(expr) = policy.attribute_filter.as_deref().filter(|e| !e.trim().is_empty())
        else {
            return FilterOutcome::Unfiltered;
        };
        let Some(filter) = &self.filter else {
            tracing::debug!("Policy has a filter but no filter executor is wired, searching unfiltered");
            return FilterOutcome::Unfiltered;
        };

        match filter.resolve(&source.index_name, expr).await {
            Ok(Some(refs)) if refs.is_empty() => FilterOutcome::NoMatches,
            Ok(Some(refs)) => FilterOutcome::Allowed(refs),
            Ok(None) => {
                tracing::debug!("Filter capability unavailable for index, searching unfiltered");
                FilterOutcome::Unfiltered
            }
            Err(e) => {
                tracing::warn!(error = %e, "Filter resolution failed, searching unfiltered");
                FilterOutcome::Unfiltered
            }
        }
    }
}

enum FilterOutcome {
    Unfiltered,
    Allowed(Vec<String>),
    NoMatches,
}
