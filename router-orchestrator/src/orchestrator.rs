//! The Charge Orchestrator, grounded on the original's
//! `routing/services/charge_service.py::create_charge`.

use std::sync::Arc;

use router_core::{
    ChargeRequest, Payment, PaymentStatus, ProcessorRequest, ProcessorStatus, Provider, RouterError,
    RouterResult,
};
use router_engine::RoutingEngine;
use router_intel::FeedbackCollector;
use router_processors::ProcessorRegistry;
use tracing::warn;

use crate::directory::{CustomerDirectory, MerchantDirectory};
use crate::precalc::PrecalcRepository;

/// The provider used when the routing engine itself is unavailable
/// (infrastructure failure, not a strategy failure, those are the
/// engine's own circuit breaker's job).
pub const ENGINE_UNAVAILABLE_DEFAULT: Provider = Provider::Stripe;
pub const ENGINE_UNAVAILABLE_AUDIT: &str = "Fallback: Routing Engine Unavailable";

/// Wires together existence checks, the pre-calc cache, the routing
/// engine, the processor registry, and feedback emission into the single
/// `create_charge` entry point.
pub struct ChargeOrchestrator {
    merchants: Arc<dyn MerchantDirectory>,
    customers: Arc<dyn CustomerDirectory>,
    precalc: Arc<PrecalcRepository>,
    engine: Arc<RoutingEngine>,
    registry: Arc<ProcessorRegistry>,
    feedback: Option<Arc<dyn FeedbackCollector>>,
}

impl ChargeOrchestrator {
    pub fn new(
        merchants: Arc<dyn MerchantDirectory>,
        customers: Arc<dyn CustomerDirectory>,
        precalc: Arc<PrecalcRepository>,
        engine: Arc<RoutingEngine>,
        registry: Arc<ProcessorRegistry>,
        feedback: Option<Arc<dyn FeedbackCollector>>,
    ) -> Self {
        ChargeOrchestrator {
            merchants,
            customers,
            precalc,
            engine,
            registry,
            feedback,
        }
    }

    /// 1. Validate merchant and customer exist.
    /// 2. If a subscription id is present and its pre-calculated route is
    ///    still valid, adopt it.
    /// 3. Otherwise delegate to the routing engine; an infrastructure
    ///    failure there falls back to a configured default.
    /// 4. Look up the adapter; a missing registration is a hard error.
    /// 5. Charge, map the response to a terminal status, persist.
    /// 6. Hand the persisted payment to the feedback collector.
    pub async fn create_charge(&self, request: ChargeRequest) -> RouterResult<Payment> {
        request.validate()?;

        if !self.merchants.exists(&request.merchant_id).await? {
            return Err(RouterError::NotFound(format!(
                "merchant {} not found",
                request.merchant_id
            )));
        }
        if !self.customers.exists(&request.customer_id).await? {
            return Err(RouterError::NotFound(format!(
                "customer {} not found",
                request.customer_id
            )));
        }

        let (provider, audit) = self.resolve_route(&request).await?;

        let adapter = self.registry.get(provider)?;
        let payment_method_token = self.customers.payment_method_token(&request.customer_id).await?;

        let processor_request = ProcessorRequest {
            amount: request.amount,
            currency: request.currency.clone(),
            payment_method_token,
            merchant_id: request.merchant_id.clone(),
            customer_id: request.customer_id.clone(),
            description: request.description.clone(),
            metadata: Default::default(),
        };

        let response = adapter.charge(&processor_request).await;
        let terminal_status = match response.status {
            ProcessorStatus::Success => PaymentStatus::Completed,
            _ => PaymentStatus::Failed,
        };

        let mut payment = Payment::new_pending(&request);
        payment.assign_route(provider, response.processor_transaction_id, audit)?;
        payment.transition_to(if terminal_status == PaymentStatus::Completed {
            PaymentStatus::Authorized
        } else {
            PaymentStatus::Failed
        })?;
        if terminal_status == PaymentStatus::Completed {
            payment.transition_to(PaymentStatus::Completed)?;
        }

        if let Some(collector) = &self.feedback {
            collector.collect(&payment).await?;
        }

        Ok(payment)
    }

    async fn resolve_route(&self, request: &ChargeRequest) -> RouterResult<(Provider, String)> {
        if let Some(subscription_id) = &request.subscription_id {
            if let Some(route) = self.precalc.find_valid(subscription_id).await? {
                return Ok((route.provider, format!("Pre-calculated: {}", route.routing_decision)));
            }
        }

        match self.engine.find_best_route(request).await {
            Ok(outcome) => Ok((outcome.provider, outcome.audit)),
            Err(err) => {
                warn!(error = %err, "routing engine unavailable, using configured default");
                Ok((ENGINE_UNAVAILABLE_DEFAULT, ENGINE_UNAVAILABLE_AUDIT.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directory::{InMemoryCustomerDirectory, InMemoryMerchantDirectory};
    use chrono::Duration;
    use router_core::{
        now_utc, InMemoryBinMetadataProvider, InMemoryKeyValueStore, PrecalculatedRoute,
        StaticHealthSnapshot,
    };
    use router_intel::IntelligenceRepository;
    use router_processors::StripeAdapter;
    use router_reconcile::FeeTable;
    use router_strategy::DeterministicLeastCostStrategy;
    use rust_decimal_macros::dec;

    fn request(subscription_id: Option<String>) -> ChargeRequest {
        ChargeRequest {
            merchant_id: "m1".to_string(),
            customer_id: "c1".to_string(),
            amount: dec!(20),
            currency: "USD".to_string(),
            description: "test".to_string(),
            provider: None,
            subscription_id,
            context: None,
        }
    }

    async fn orchestrator() -> (ChargeOrchestrator, Arc<InMemoryMerchantDirectory>, Arc<InMemoryCustomerDirectory>) {
        let merchants = Arc::new(InMemoryMerchantDirectory::new());
        merchants.register("m1").await;
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        customers.register("c1", "tok_abc").await;

        let precalc = Arc::new(PrecalcRepository::new(InMemoryKeyValueStore::new()));

        let mut registry = ProcessorRegistry::new();
        registry.register(Provider::Stripe, Arc::new(StripeAdapter));
        registry.register(Provider::Adyen, Arc::new(StripeAdapter));

        let engine = Arc::new(RoutingEngine::new(
            FeeTable::new(vec![]),
            Arc::new(IntelligenceRepository::new(InMemoryKeyValueStore::new())),
            Arc::new(InMemoryBinMetadataProvider::new()),
            Arc::new(StaticHealthSnapshot::new()),
            Arc::new(DeterministicLeastCostStrategy),
            Arc::new(DeterministicLeastCostStrategy),
        ));

        let orchestrator = ChargeOrchestrator::new(
            merchants.clone(),
            customers.clone(),
            precalc,
            engine,
            Arc::new(registry),
            None,
        );
        (orchestrator, merchants, customers)
    }

    #[tokio::test]
    async fn unknown_merchant_is_rejected() {
        let (orchestrator, _merchants, _customers) = orchestrator().await;
        let mut bad_request = request(None);
        bad_request.merchant_id = "unknown".to_string();
        let err = orchestrator.create_charge(bad_request).await.unwrap_err();
        assert!(matches!(err, RouterError::NotFound(_)));
    }

    #[tokio::test]
    async fn charge_without_subscription_uses_routing_engine() {
        let (orchestrator, _merchants, _customers) = orchestrator().await;
        let payment = orchestrator.create_charge(request(None)).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.routing_decision.as_deref(), Some("DeterministicLeastCost"));
    }

    #[tokio::test]
    async fn precalculated_route_is_honored_over_the_engine() {
        let (orchestrator, _merchants, _customers) = orchestrator().await;
        orchestrator
            .precalc
            .save(PrecalculatedRoute::new(
                "sub1",
                Provider::Adyen,
                "DeterministicLeastCost",
                now_utc() + Duration::hours(1),
            ))
            .await
            .unwrap();

        let payment = orchestrator
            .create_charge(request(Some("sub1".to_string())))
            .await
            .unwrap();
        assert_eq!(payment.provider, Some(Provider::Adyen));
        assert!(payment
            .routing_decision
            .as_deref()
            .unwrap()
            .starts_with("Pre-calculated: "));
    }

    #[tokio::test]
    async fn expired_precalculated_route_falls_through_to_the_engine() {
        let (orchestrator, _merchants, _customers) = orchestrator().await;
        orchestrator
            .precalc
            .save(PrecalculatedRoute::new(
                "sub1",
                Provider::Adyen,
                "DeterministicLeastCost",
                now_utc() - Duration::hours(1),
            ))
            .await
            .unwrap();

        let payment = orchestrator
            .create_charge(request(Some("sub1".to_string())))
            .await
            .unwrap();
        assert_eq!(payment.routing_decision.as_deref(), Some("DeterministicLeastCost"));
    }
}
