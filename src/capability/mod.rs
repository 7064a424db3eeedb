pub mod cache;
pub mod resolver;
pub mod types;

pub use cache::CapabilityEmbeddingCache;
pub use resolver::{CapabilityMatch, CapabilityResolver, MatchSignal};
pub use types::{Capability, CapabilityEmbedding, CapabilityKind, CapabilityOwner};
