//! The Routing Engine, grounded on the original's
//! `routing/engine.py::find_best_route` and its five-step decision flow.

use std::sync::Arc;

use router_core::{
    BinMetadataProvider, ChargeRequest, HealthSnapshot, Provider, RouterResult,
};
use router_intel::IntelligenceRepository;
use router_reconcile::{FeeTable, Reconciler};
use router_strategy::DecisionStrategy;
use tracing::warn;

use crate::dimension::derive_dimension;

/// The provider chosen when every strategy, including the deterministic
/// fallback, somehow fails to decide. This is the engine's last line of
/// defense: it always returns `Ok`, never panics, and is distinguishable
/// in the audit trail from a normal decision.
pub const ULTIMATE_DEFAULT_PROVIDER: Provider = Provider::Stripe;
pub const ULTIMATE_DEFAULT_AUDIT: &str = "Fallback: Ultimate Default";

/// The outcome of a routing decision: the chosen provider and the audit
/// string recorded on the payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingOutcome {
    pub provider: Provider,
    pub audit: String,
}

/// Wires the Reconciler, the Intelligence Repository, and a decision
/// strategy into the single entry point orchestration calls to pick a
/// provider for a charge.
pub struct RoutingEngine {
    fee_table: FeeTable,
    repository: Arc<IntelligenceRepository>,
    bin_provider: Arc<dyn BinMetadataProvider>,
    health: Arc<dyn HealthSnapshot>,
    strategy: Arc<dyn DecisionStrategy>,
    fallback_strategy: Arc<dyn DecisionStrategy>,
}

impl RoutingEngine {
    pub fn new(
        fee_table: FeeTable,
        repository: Arc<IntelligenceRepository>,
        bin_provider: Arc<dyn BinMetadataProvider>,
        health: Arc<dyn HealthSnapshot>,
        strategy: Arc<dyn DecisionStrategy>,
        fallback_strategy: Arc<dyn DecisionStrategy>,
    ) -> Self {
        RoutingEngine {
            fee_table,
            repository,
            bin_provider,
            health,
            strategy,
            fallback_strategy,
        }
    }

    /// Implements the five steps:
    /// 1. An explicit `request.provider` short-circuits everything else.
    /// 2. Derive the routing dimension from BIN metadata and context.
    /// 3. Read dimensioned performance and reconcile against fees/health.
    /// 4. Delegate to the configured strategy.
    /// 5. A two-layer circuit breaker: strategy failure falls back to
    ///    `DeterministicLeastCost`; if that too fails, the engine returns
    ///    the ultimate default rather than propagate an error, since a
    ///    payment always needs *some* provider to attempt.
    ///
    /// Infrastructure failures from the repository or health snapshot are
    /// not caught here: the engine declines to invent a decision when its
    /// own data sources are unavailable, and lets the caller's own
    /// circuit breaker decide what to do.
    pub async fn find_best_route(&self, request: &ChargeRequest) -> RouterResult<RoutingOutcome> {
        if let Some(provider) = request.provider {
            return Ok(RoutingOutcome {
                provider,
                audit: "Explicit Override".to_string(),
            });
        }

        let dimension = derive_dimension(request, self.bin_provider.as_ref()).await;
        let performance = self.repository.find_by_dimension(&dimension).await?;
        let reconciler = Reconciler::new(&self.fee_table);
        let resolved = reconciler
            .resolve(&dimension, &performance, self.health.as_ref())
            .await;

        match self.strategy.decide(request, &resolved).await {
            Ok(provider) => Ok(RoutingOutcome {
                provider,
                audit: self.strategy.name().to_string(),
            }),
            Err(primary_err) => {
                warn!(
                    error = %primary_err,
                    strategy = self.strategy.name(),
                    "routing strategy failed, falling back"
                );
                match self.fallback_strategy.decide(request, &resolved).await {
                    Ok(provider) => Ok(RoutingOutcome {
                        provider,
                        audit: format!("Fallback: {}", self.fallback_strategy.name()),
                    }),
                    Err(fallback_err) => {
                        warn!(
                            error = %fallback_err,
                            "fallback strategy also failed, using ultimate default"
                        );
                        Ok(RoutingOutcome {
                            provider: ULTIMATE_DEFAULT_PROVIDER,
                            audit: ULTIMATE_DEFAULT_AUDIT.to_string(),
                        })
                    }
                }
            }
        }
    }
}
