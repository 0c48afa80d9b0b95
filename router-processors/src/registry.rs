//! The processor registry, grounded on the original's
//! `processors/registry.py`. Populated once at startup and treated as
//! read-only thereafter; a missing registration is a configuration error,
//! not a routing outcome.

use std::collections::HashMap;
use std::sync::Arc;

use router_core::{Provider, RouterError, RouterResult};

use crate::adapter::ProcessorAdapter;

#[derive(Default)]
pub struct ProcessorRegistry {
    adapters: HashMap<Provider, Arc<dyn ProcessorAdapter>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Provider, adapter: Arc<dyn ProcessorAdapter>) {
        self.adapters.insert(provider, adapter);
    }

    pub fn get(&self, provider: Provider) -> RouterResult<Arc<dyn ProcessorAdapter>> {
        self.adapters
            .get(&provider)
            .cloned()
            .ok_or_else(|| RouterError::Infrastructure(format!("no processor registered for {provider}")))
    }

    pub fn registered_providers(&self) -> Vec<Provider> {
        self.adapters.keys().copied().collect()
    }
}
