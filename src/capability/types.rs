//! Type definitions for capability routing.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// What kind of invocable unit a capability is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Tool,
    Prompt,
    Resource,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Tool => "tool",
            CapabilityKind::Prompt => "prompt",
            CapabilityKind::Resource => "resource",
        }
    }
}

/// One invocable unit exposed by a capability owner.
///
/// Resources carry a URI which serves as their stable identity instead of
/// the name. A capability with an empty or whitespace-only name is invalid:
/// it is skipped during embedding generation and can never be matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    pub kind: CapabilityKind,
    /// Unique within the owner.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Stable identity for resource-kind capabilities.
    #[serde(default)]
    pub uri: Option<String>,
}

impl Capability {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Stable identity: the URI for resources that have one, the name
    /// otherwise.
    pub fn identity(&self) -> &str {
        match (&self.kind, &self.uri) {
            (CapabilityKind::Resource, Some(uri)) => uri,
            _ => &self.name,
        }
    }

    /// Canonical text an embedding is derived from. Changing this text is
    /// what invalidates a cached embedding for the capability.
    pub fn embedding_text(&self) -> String {
        format!("{}: {} | {}", self.kind.as_str(), self.name, self.description)
    }
}

/// An external endpoint exposing zero or more capabilities. Discovered and
/// refreshed by the host's connection manager; read-only to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityOwner {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub last_fetched: Option<SystemTime>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl CapabilityOwner {
    /// Capabilities eligible for embedding and matching.
    pub fn valid_capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter().filter(|c| c.is_valid())
    }
}

/// A cached projection of one capability with its embedding vector.
#[derive(Debug, Clone)]
pub struct CapabilityEmbedding {
    pub owner_id: String,
    pub owner_name: String,
    pub kind: CapabilityKind,
    pub name: String,
    /// Stable routing identity, see [`Capability::identity`].
    pub identity: String,
    pub vector: Vec<f32>,
    pub generated_at: SystemTime,
}
