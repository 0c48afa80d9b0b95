//! The Intelligence Repository, grounded on the original's
//! `routing/decisioning/repository.py`.

use std::sync::Arc;

use router_core::{KeyValueStore, ProviderPerformance, RouterResult, RoutingDimension};

/// Maps a serialized [`RoutingDimension`] to its performance records, at
/// most one per provider. Backed by any `KeyValueStore<Vec<ProviderPerformance>>`;
/// `save` goes through `KeyValueStore::update_with` so the read of the
/// existing bucket and the write of the upserted one happen as a single
/// critical section, and two concurrent saves for the same dimension never
/// read the same stale bucket and clobber each other.
pub struct IntelligenceRepository {
    store: Arc<dyn KeyValueStore<Vec<ProviderPerformance>>>,
}

impl IntelligenceRepository {
    pub fn new(store: Arc<dyn KeyValueStore<Vec<ProviderPerformance>>>) -> Self {
        IntelligenceRepository { store }
    }

    /// Upserts a performance record: replaces the existing row for the
    /// same provider within the same dimension, or appends a new one.
    pub async fn save(&self, performance: ProviderPerformance) -> RouterResult<()> {
        let key = performance.dimension.canonical_key();
        self.store
            .update_with(
                key,
                Box::new(move |existing| {
                    let mut bucket = existing.unwrap_or_default();
                    if let Some(slot) = bucket
                        .iter_mut()
                        .find(|record| record.provider == performance.provider)
                    {
                        *slot = performance;
                    } else {
                        bucket.push(performance);
                    }
                    bucket
                }),
            )
            .await
    }

    pub async fn find_by_dimension(
        &self,
        dimension: &RoutingDimension,
    ) -> RouterResult<Vec<ProviderPerformance>> {
        Ok(self
            .store
            .get(&dimension.canonical_key())
            .await?
            .unwrap_or_default())
    }

    /// Flattens every bucket. Used for diagnostics and for assembling LLM
    /// context.
    pub async fn all(&self) -> RouterResult<Vec<ProviderPerformance>> {
        Ok(self.store.values().await?.into_iter().flatten().collect())
    }
}
