//! Per-owner cache of capability embeddings.
//!
//! Embeddings are regenerated lazily: the first request for an owner runs
//! one batched embedding call for its whole capability set, every later
//! request is served from memory. The cache is an explicitly constructed
//! component: construct once per process and share by `Arc`.

use crate::capability::types::{CapabilityEmbedding, CapabilityOwner};
use crate::error::Result;
use crate::ports::EmbeddingGenerator;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tokio::sync::OnceCell;

/// Cached entries for one owner, stamped with the fingerprint of the
/// capability text set they were computed from.
struct OwnerEntries {
    fingerprint: [u8; 32],
    entries: Vec<CapabilityEmbedding>,
}

type Slot = Arc<OnceCell<Arc<OwnerEntries>>>;

/// Maps owner id → lazily computed capability embeddings.
///
/// # Concurrency
/// Each owner has its own `OnceCell` slot: concurrent first access for the
/// same owner serializes on the cell and runs the embedding call at most
/// once, while different owners never block each other. The map mutex is
/// only held to look up or replace a slot, never across an await. A failed
/// or cancelled computation leaves the slot empty, so no partial entry can
/// ever be observed.
#[derive(Default)]
pub struct CapabilityEmbeddingCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl CapabilityEmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached embeddings for every owner, computing missing
    /// entries with `embedder`. One batched embedding call per uncached
    /// owner; owners whose capability text set changed since their entries
    /// were computed are recomputed transparently.
    pub async fn get_or_create(
        &self,
        owners: &[CapabilityOwner],
        embedder: &dyn EmbeddingGenerator,
    ) -> Result<Vec<CapabilityEmbedding>> {
        let mut all = Vec::new();

        for owner in owners {
            let fingerprint = capability_fingerprint(owner);
            let mut slot = self.slot(&owner.id);
            let mut cached = slot
                .get_or_try_init(|| compute_entries(owner, fingerprint, embedder))
                .await?
                .clone();

            if cached.fingerprint != fingerprint {
                // Capability set drifted since the entries were computed.
                tracing::debug!(owner_id = %owner.id, "Capability set changed, recomputing embeddings");
                self.invalidate(&owner.id);
                slot = self.slot(&owner.id);
                cached = slot
                    .get_or_try_init(|| compute_entries(owner, fingerprint, embedder))
                    .await?
                    .clone();
            }

            all.extend(cached.entries.iter().cloned());
        }

        Ok(all)
    }

    /// Drop the cached entries for exactly one owner. The next
    /// `get_or_create` for that owner recomputes; other owners are
    /// unaffected.
    pub fn invalidate(&self, owner_id: &str) {
        let removed = self
            .slots
            .lock()
            .expect("capability cache lock poisoned")
            .remove(owner_id)
            .is_some();
        if removed {
            tracing::debug!(owner_id, "Capability embeddings invalidated");
        }
    }

    fn slot(&self, owner_id: &str) -> Slot {
        self.slots
            .lock()
            .expect("capability cache lock poisoned")
            .entry(owner_id.to_string())
            .or_default()
            .clone()
    }
}

/// SHA-256 over the owner's valid capability embedding texts. Matches the
/// exact text the embeddings were derived from, so any rename or
/// re-description shows up as a different fingerprint.
fn capability_fingerprint(owner: &CapabilityOwner) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for capability in owner.valid_capabilities() {
        hasher.update(capability.embedding_text().as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().into()
}

async fn compute_entries(
    owner: &CapabilityOwner,
    fingerprint: [u8; 32],
    embedder: &dyn EmbeddingGenerator,
) -> Result<Arc<OwnerEntries>> {
    let capabilities: Vec<_> = owner.valid_capabilities().collect();

    // Zero capabilities: cache the empty set without a generator call.
    if capabilities.is_empty() {
        return Ok(Arc::new(OwnerEntries {
            fingerprint,
            entries: Vec::new(),
        }));
    }

    let texts: Vec<String> = capabilities.iter().map(|c| c.embedding_text()).collect();
    let vectors = embedder.embed(&texts).await?;

    let generated_at = SystemTime::now();
    let mut entries = Vec::with_capacity(capabilities.len());

    for (capability, vector) in capabilities.iter().zip(vectors) {
        match vector {
            Some(vector) => entries.push(CapabilityEmbedding {
                owner_id: owner.id.clone(),
                owner_name: owner.display_name.clone(),
                kind: capability.kind,
                name: capability.name.clone(),
                identity: capability.identity().to_string(),
                vector,
                generated_at,
            }),
            None => {
                tracing::warn!(
                    owner_id = %owner.id,
                    capability = %capability.name,
                    "Embedding generation failed for capability, skipping"
                );
            }
        }
    }

    tracing::debug!(
        owner_id = %owner.id,
        entries = entries.len(),
        "Capability embeddings computed"
    );

    Ok(Arc::new(OwnerEntries {
        fingerprint,
        entries,
    }))
}
