//! Contextor - Semantic retrieval core for AI chat systems
//!
//! Two problems, one primitive: find the content chunks most relevant to a
//! user message for context injection (RAG), and find the external
//! capability (tool, prompt, resource) best matching a request that names
//! none. Both embed a query, rank pre-embedded candidates by cosine
//! similarity, threshold, and deduplicate, with a stemmed-keyword fallback
//! when embeddings are unavailable.
//!
//! The host wires in the collaborators ([`ports`]): an embedding
//! generator, a vector search service, optionally a filter executor and a
//! completion client for query rewriting.

pub mod capability;
pub mod config;
pub mod error;
pub mod math;
pub mod policy;
pub mod ports;
pub mod retrieval;
pub mod tokenize;

// Re-export key types for convenience
pub use capability::{
    Capability, CapabilityEmbeddingCache, CapabilityKind, CapabilityMatch, CapabilityOwner,
    CapabilityResolver,
};
pub use config::RetrievalConfig;
pub use error::{Result, RetrievalError};
pub use policy::RagPolicy;
pub use ports::{CompletionClient, EmbeddingGenerator, FilterExecutor, VectorSearch};
pub use retrieval::{
    OnDemandRetrievalTool, ReferenceIndex, RetrievalOrchestrator, RetrievalResult, SourceBinding,
    ToolContext, NOT_IN_SOURCE_BLOCK,
};
