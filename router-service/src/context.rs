//! The composition root: owns every repository, the processor registry,
//! the active decision strategy, and the scheduler, constructed once at
//! binary startup.

use std::sync::Arc;

use router_core::{
    InMemoryBinMetadataProvider, InMemoryKeyValueStore, InMemoryRelationalStore, Provider,
    StaticHealthSnapshot, Subscription,
};
use router_engine::RoutingEngine;
use router_intel::{FeedbackCollector, IntelligenceRepository, InMemoryFeedbackStore, LocalFeedbackCollector};
use router_orchestrator::{ChargeOrchestrator, InMemoryCustomerDirectory, InMemoryMerchantDirectory, PrecalcRepository};
use router_processors::{AdyenAdapter, BraintreeAdapter, InternalAdapter, ProcessorRegistry, StripeAdapter};
use router_reconcile::{FeeStructure, FeeTable};
use router_scheduler::{RenewalScheduler, SchedulerConfig};
use router_strategy::{
    DecisionStrategy, DeterministicLeastCostStrategy, FixedStrategy, LlmDecisionStrategy,
    PlannerRoutingStrategy,
};
use router_tokio::NotifyOnce;
use rust_decimal_macros::dec;

use crate::config::{RouterConfig, StrategySelector};
use crate::llm_client::ReqwestLlmClient;

/// Bootstrap fee rows. Real interchange-aware pricing is loaded from the
/// (out-of-scope) fee service; these wildcard rows keep the demo runnable
/// end-to-end without external configuration.
fn default_fee_table() -> FeeTable {
    FeeTable::new(vec![
        FeeStructure {
            provider: Provider::Stripe,
            card_network: None,
            card_type: None,
            region: None,
            fixed_fee: dec!(0.30),
            variable_fee_percent: dec!(2.9),
        },
        FeeStructure {
            provider: Provider::Adyen,
            card_network: None,
            card_type: None,
            region: None,
            fixed_fee: dec!(0.10),
            variable_fee_percent: dec!(2.0),
        },
        FeeStructure {
            provider: Provider::Braintree,
            card_network: None,
            card_type: None,
            region: None,
            fixed_fee: dec!(0.30),
            variable_fee_percent: dec!(2.9),
        },
        FeeStructure {
            provider: Provider::Internal,
            card_network: None,
            card_type: None,
            region: None,
            fixed_fee: dec!(0),
            variable_fee_percent: dec!(0.5),
        },
    ])
}

fn build_strategy(config: &RouterConfig) -> Arc<dyn DecisionStrategy> {
    match config.routing_strategy {
        StrategySelector::LeastCost => Arc::new(DeterministicLeastCostStrategy),
        StrategySelector::Fixed => Arc::new(FixedStrategy::new(config.fixed_provider)),
        StrategySelector::Llm => {
            let client = ReqwestLlmClient::new(config.llm_api_base_url.clone(), config.llm_api_key.clone());
            Arc::new(LlmDecisionStrategy::new(
                client,
                config.routing_objective.clone(),
                config.routing_model.clone(),
            ))
        }
        StrategySelector::Planner => {
            let client = ReqwestLlmClient::new(config.llm_api_base_url.clone(), config.llm_api_key.clone());
            Arc::new(PlannerRoutingStrategy::new(
                client,
                config.routing_objective.clone(),
                config.routing_model.clone(),
            ))
        }
    }
}

fn build_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.register(Provider::Stripe, Arc::new(StripeAdapter));
    registry.register(Provider::Adyen, Arc::new(AdyenAdapter));
    registry.register(Provider::Braintree, Arc::new(BraintreeAdapter));
    registry.register(Provider::Internal, Arc::new(InternalAdapter));
    registry
}

/// Owns every long-lived component. `shutdown` is the single `NotifyOnce`
/// handle every background task (scheduler, feedback drain) selects on.
pub struct RouterContext {
    pub orchestrator: Arc<ChargeOrchestrator>,
    pub scheduler: Arc<RenewalScheduler>,
    pub feedback_store: Arc<InMemoryFeedbackStore>,
    pub intelligence_repository: Arc<IntelligenceRepository>,
    pub subscriptions: Arc<InMemoryRelationalStore<Subscription>>,
    pub shutdown: NotifyOnce,
}

impl RouterContext {
    pub fn bootstrap(config: &RouterConfig) -> Self {
        let intelligence_repository = Arc::new(IntelligenceRepository::new(InMemoryKeyValueStore::new()));
        let bin_provider = Arc::new(InMemoryBinMetadataProvider::new());
        let health = Arc::new(StaticHealthSnapshot::new());
        let strategy = build_strategy(config);

        let engine = Arc::new(RoutingEngine::new(
            default_fee_table(),
            intelligence_repository.clone(),
            bin_provider,
            health,
            strategy,
            Arc::new(DeterministicLeastCostStrategy),
        ));

        let merchants = Arc::new(InMemoryMerchantDirectory::new());
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        let precalc = Arc::new(PrecalcRepository::new(InMemoryKeyValueStore::new()));
        let registry = Arc::new(build_registry());

        let feedback_store = Arc::new(InMemoryFeedbackStore::new());
        let feedback_collector: Arc<dyn FeedbackCollector> =
            Arc::new(LocalFeedbackCollector::new(feedback_store.clone()));

        let orchestrator = Arc::new(ChargeOrchestrator::new(
            merchants,
            customers,
            precalc.clone(),
            engine.clone(),
            registry,
            Some(feedback_collector),
        ));

        let subscriptions: Arc<InMemoryRelationalStore<Subscription>> = InMemoryRelationalStore::new();
        let scheduler = Arc::new(RenewalScheduler::new(
            subscriptions.clone(),
            precalc,
            engine,
            SchedulerConfig {
                tick_interval: config.renewal_tick,
                lookahead: config.renewal_lookahead,
            },
        ));

        RouterContext {
            orchestrator,
            scheduler,
            feedback_store,
            intelligence_repository,
            subscriptions,
            shutdown: NotifyOnce::new(),
        }
    }
}
