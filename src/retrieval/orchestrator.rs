//! Context-injection orchestration.
//!
//! Two strategies over the same finalize path:
//!
//! **Immediate**: embed the raw user message, search once. Used when the
//! policy enables immediate retrieval, or when tool invocation is disabled
//! for the turn and injection is the model's only route to the source.
//!
//! **Query-rewriting**: ask a lightweight completion to split the message
//! into focused sub-queries, search each concurrently, merge by
//! (reference, chunk) identity. Used for preemptive retrieval.
//!
//! Every failure path degrades to "no context injected"; a retrieval
//! problem must never abort the chat turn.

use crate::config::RetrievalConfig;
use crate::policy::RagPolicy;
use crate::ports::{CompletionClient, EmbeddingGenerator, VectorSearch};
use crate::retrieval::render::{render_context_block, NOT_IN_SOURCE_BLOCK};
use crate::retrieval::rewrite::rewrite_queries;
use crate::retrieval::types::{RetrievalResult, SourceBinding};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct RetrievalOrchestrator {
    embedder: Arc<dyn EmbeddingGenerator>,
    search: Arc<dyn VectorSearch>,
    completion: Option<Arc<dyn CompletionClient>>,
    config: RetrievalConfig,
}

impl RetrievalOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingGenerator>,
        search: Arc<dyn VectorSearch>,
        completion: Option<Arc<dyn CompletionClient>>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            search,
            completion,
            config,
        }
    }

    /// Immediate strategy: one embedding, one search, inject.
    ///
    /// Returns the context block to append to the system instructions, the
    /// fixed not-in-source instruction when an in-scope search comes back
    /// empty, or `None` when there is nothing to inject.
    pub async fn retrieve_immediate(
        &self,
        message: &str,
        source: &SourceBinding,
        policy: &RagPolicy,
    ) -> Option<String> {
        let start = Instant::now();
        metrics::counter!("retrieval_requests_total", "strategy" => "immediate").increment(1);

        let results = self
            .run_subquery(message, source, self.top_n(policy))
            .await?;

        let block = self.finalize(results, policy);
        metrics::histogram!("retrieval_latency_ms").record(start.elapsed().as_millis() as f64);
        block
    }

    /// Query-rewriting strategy: rewrite, fan out, merge, inject.
    pub async fn retrieve_with_rewrite(
        &self,
        message: &str,
        source: &SourceBinding,
        policy: &RagPolicy,
    ) -> Option<String> {
        let start = Instant::now();
        metrics::counter!("retrieval_requests_total", "strategy" => "rewrite").increment(1);

        let queries = match &self.completion {
            Some(completion) => {
                rewrite_queries(completion.as_ref(), message, self.config.max_subqueries).await
            }
            None => vec![message.to_string()],
        };

        let top_n = self.top_n(policy);

        // Sub-queries are independent reads: fan out, and let one failed
        // sub-query contribute nothing instead of aborting the rest.
        let result_sets = join_all(
            queries
                .iter()
                .map(|query| self.run_subquery(query, source, top_n)),
        )
        .await;

        let mut merged = merge_results(result_sets.into_iter().flatten().flatten());
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        merged.truncate(top_n);

        let block = self.finalize(merged, policy);
        metrics::histogram!("retrieval_latency_ms").record(start.elapsed().as_millis() as f64);
        block
    }

    fn top_n(&self, policy: &RagPolicy) -> usize {
        if policy.top_n > 0 {
            policy.top_n
        } else {
            self.config.default_top_n
        }
    }

    /// Embed one query and search the source's index. Provider failures
    /// degrade to `None` (no contribution), logged at warn.
    async fn run_subquery(
        &self,
        query: &str,
        source: &SourceBinding,
        top_n: usize,
    ) -> Option<Vec<RetrievalResult>> {
        let vector = match self.embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) => match vectors.pop().flatten() {
                Some(vector) => vector,
                None => {
                    tracing::warn!("Embedding generator returned no vector for query");
                    return None;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Query embedding failed");
                return None;
            }
        };

        match self
            .search
            .search(&source.index_name, &vector, &source.source_id, top_n, None)
            .await
        {
            Ok(results) => Some(results),
            Err(e) => {
                tracing::warn!(error = %e, index = %source.index_name, "Vector search failed");
                None
            }
        }
    }

    /// Shared tail of both strategies: threshold by strictness, decide the
    /// empty-result behavior, render with stable citation numbers.
    fn finalize(&self, results: Vec<RetrievalResult>, policy: &RagPolicy) -> Option<String> {
        let kept = apply_strictness(results, policy);

        metrics::histogram!("retrieval_results_kept").record(kept.len() as f64);

        if kept.is_empty() {
            tracing::debug!(in_scope = policy.in_scope, "No results survived thresholding");
            return policy.in_scope.then(|| NOT_IN_SOURCE_BLOCK.to_string());
        }

        tracing::debug!(results = kept.len(), "Injecting retrieved context");
        Some(render_context_block(&kept, policy.in_scope))
    }
}

/// Drop results below the policy's strictness floor, clamping scores into
/// [0, 1] first so an unnormalized provider score cannot dodge the floor.
pub(crate) fn apply_strictness(
    results: Vec<RetrievalResult>,
    policy: &RagPolicy,
) -> Vec<RetrievalResult> {
    let floor = policy.strictness_floor();
    results
        .into_iter()
        .map(|mut result| {
            result.score = result.score.clamp(0.0, 1.0);
            result
        })
        .filter(|result| result.score >= floor)
        .collect()
}

/// Merge sub-query result sets, deduplicating on (reference, chunk)
/// identity. First-seen order is preserved; a duplicate keeps the higher
/// score.
fn merge_results(results: impl Iterator<Item = RetrievalResult>) -> Vec<RetrievalResult> {
    let mut merged: Vec<RetrievalResult> = Vec::new();
    let mut seen: HashMap<(String, Option<u32>), usize> = HashMap::new();

    for result in results {
        match seen.get(&result.dedup_key()) {
            Some(&i) => {
                if result.score > merged[i].score {
                    merged[i].score = result.score;
                }
            }
            None => {
                seen.insert(result.dedup_key(), merged.len());
                merged.push(result);
            }
        }
    }

    merged
}
