//! The Precalc Repository, grounded on the original's
//! `routing/services/precalc_service.py`. Written by the Renewal
//! Scheduler, read by the Charge Orchestrator; at most one row per
//! subscription id, upserted on save.

use std::sync::Arc;

use router_core::{KeyValueStore, PrecalculatedRoute, RouterResult};

pub struct PrecalcRepository {
    store: Arc<dyn KeyValueStore<PrecalculatedRoute>>,
}

impl PrecalcRepository {
    pub fn new(store: Arc<dyn KeyValueStore<PrecalculatedRoute>>) -> Self {
        PrecalcRepository { store }
    }

    pub async fn save(&self, route: PrecalculatedRoute) -> RouterResult<()> {
        let key = route.subscription_id.clone();
        self.store.set(key, route).await
    }

    /// Returns the cached route only if it exists and hasn't expired.
    /// Expired rows are left in place; the next successful scheduler tick
    /// overwrites them, and an expired row is simply treated as a miss.
    pub async fn find_valid(&self, subscription_id: &str) -> RouterResult<Option<PrecalculatedRoute>> {
        Ok(self
            .store
            .get(subscription_id)
            .await?
            .filter(PrecalculatedRoute::is_valid))
    }
}
