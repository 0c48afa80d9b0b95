//! The flat context map a planner run threads through its stages,
//! grounded on the original's `context: Dict[str, Any]` passed to every
//! agent's `run`.

use std::collections::BTreeMap;

use router_core::{ChargeRequest, InterchangeFee, ResolvedProvider};
use serde_json::Value;

/// State for one planner run. Specialists read from this and return their
/// own verdict; they never mutate each other's outputs, each writes
/// exactly one entry into `evidence`, keyed by its own name.
#[derive(Debug, Clone)]
pub struct PlannerContext {
    pub payment: ChargeRequest,
    pub providers: Vec<ResolvedProvider>,
    pub bin_metadata: Option<router_core::CardBinMetadata>,
    pub interchange_fees: Vec<InterchangeFee>,
    /// `provider_health["adyen"] == "down"`, as consumed by `HealthSentinel`
    /// and enforced as a hard constraint by `Critic`.
    pub provider_health: BTreeMap<String, String>,
    pub evidence: BTreeMap<String, Value>,
    pub proposed_decision: Option<Value>,
}

impl PlannerContext {
    pub fn new(payment: ChargeRequest, providers: Vec<ResolvedProvider>) -> Self {
        PlannerContext {
            payment,
            providers,
            bin_metadata: None,
            interchange_fees: Vec::new(),
            provider_health: BTreeMap::new(),
            evidence: BTreeMap::new(),
            proposed_decision: None,
        }
    }

    pub fn with_bin_metadata(mut self, metadata: router_core::CardBinMetadata) -> Self {
        self.bin_metadata = Some(metadata);
        self
    }

    pub fn with_interchange_fees(mut self, fees: Vec<InterchangeFee>) -> Self {
        self.interchange_fees = fees;
        self
    }

    pub fn with_provider_health(mut self, health: BTreeMap<String, String>) -> Self {
        self.provider_health = health;
        self
    }
}
