//! Mock collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use contextor::{
    CompletionClient, EmbeddingGenerator, FilterExecutor, Result, RetrievalError, RetrievalResult,
    VectorSearch,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Initialize test logging once; respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Embedding generator backed by a fixed text → vector table.
///
/// Texts not in the table get a unit placeholder vector; texts containing
/// `fail_containing` get a per-item `None`; the first `fail_batches` calls
/// return a batch-level `Err`. Every batch is recorded so tests can assert
/// how often (and for what) the generator was called.
#[derive(Default)]
pub struct MockEmbedder {
    pub vectors: HashMap<String, Vec<f32>>,
    pub fail_containing: Option<String>,
    pub fail_batches: AtomicUsize,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingGenerator for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(texts.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .fail_batches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(RetrievalError::EmbeddingError("mock embedder down".into()));
        }

        Ok(texts
            .iter()
            .map(|text| {
                if let Some(marker) = &self.fail_containing {
                    if text.contains(marker.as_str()) {
                        return None;
                    }
                }
                Some(
                    self.vectors
                        .get(text)
                        .cloned()
                        .unwrap_or_else(|| vec![1.0, 0.0, 0.0, 0.0]),
                )
            })
            .collect())
    }
}

/// Vector search returning a canned result list, honoring the allow-list
/// and top-N restrictions.
#[derive(Default)]
pub struct MockSearch {
    pub results: Vec<RetrievalResult>,
    pub calls: AtomicUsize,
}

impl MockSearch {
    pub fn with_results(results: Vec<RetrievalResult>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorSearch for MockSearch {
    async fn search(
        &self,
        _index_name: &str,
        _query_vector: &[f32],
        _source_id: &str,
        top_n: usize,
        allowed_refs: Option<&[String]>,
    ) -> Result<Vec<RetrievalResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let results = self
            .results
            .iter()
            .filter(|r| {
                allowed_refs
                    .map(|allowed| allowed.contains(&r.reference_id))
                    .unwrap_or(true)
            })
            .take(top_n)
            .cloned()
            .collect();

        Ok(results)
    }
}

/// Completion client that replies with a fixed string, or errors when no
/// reply is configured.
pub struct MockCompletion {
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl MockCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, _system_prompt: &str, _user_text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| RetrievalError::CompletionError("mock completion down".into()))
    }
}

/// Filter executor returning a canned resolution.
pub struct MockFilter {
    pub response: Option<Vec<String>>,
}

#[async_trait]
impl FilterExecutor for MockFilter {
    async fn resolve(&self, _index_name: &str, _filter_expr: &str) -> Result<Option<Vec<String>>> {
        Ok(self.response.clone())
    }
}

/// Build a retrieval result for test fixtures.
pub fn hit(reference_id: &str, chunk: Option<u32>, text: &str, score: f32) -> RetrievalResult {
    RetrievalResult {
        reference_id: reference_id.into(),
        chunk_index: chunk,
        title: None,
        text: text.into(),
        score,
        metadata: None,
    }
}
