//! Provider health snapshots: a read-only keyed map, absent key treated
//! as up.

use async_trait::async_trait;

use crate::provider::Provider;

/// A read-only view over provider health. The reconciler excludes any
/// provider whose status is `Down`; an absent entry is `Up`.
#[async_trait]
pub trait HealthSnapshot: Send + Sync {
    async fn status(&self, provider: Provider) -> ProviderHealth;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderHealth {
    Up,
    Down,
}

/// A fixed-map snapshot, sufficient for the in-process health source and
/// for tests that need to simulate an outage.
#[derive(Debug, Clone, Default)]
pub struct StaticHealthSnapshot {
    down: std::collections::HashSet<Provider>,
}

impl StaticHealthSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_down(mut self, provider: Provider) -> Self {
        self.down.insert(provider);
        self
    }
}

#[async_trait]
impl HealthSnapshot for StaticHealthSnapshot {
    async fn status(&self, provider: Provider) -> ProviderHealth {
        if self.down.contains(&provider) {
            ProviderHealth::Down
        } else {
            ProviderHealth::Up
        }
    }
}
