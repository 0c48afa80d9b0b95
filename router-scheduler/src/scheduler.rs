//! The Renewal Scheduler, grounded on the original's
//! `routing/services/scheduler.py` and the long-lived task discipline in
//! `router-tokio`.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use router_core::{ChargeRequest, PrecalculatedRoute, RelationalStore, Subscription};
use router_engine::RoutingEngine;
use router_orchestrator::PrecalcRepository;
use router_tokio::NotifyOnce;
use tracing::warn;

/// Expiry window applied to every freshly computed pre-calculated route,
/// beyond the renewal date itself.
const PRECALC_VALIDITY_BEYOND_RENEWAL: Duration = Duration::hours(24);

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub tick_interval: StdDuration,
    pub lookahead: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            tick_interval: StdDuration::from_secs(60),
            lookahead: Duration::days(7),
        }
    }
}

/// Periodically scans for subscriptions due for renewal within the
/// lookahead window and pre-computes their route, so the Charge
/// Orchestrator can skip the routing engine entirely at renewal time.
pub struct RenewalScheduler {
    subscriptions: Arc<dyn RelationalStore<Subscription>>,
    precalc: Arc<PrecalcRepository>,
    engine: Arc<RoutingEngine>,
    config: SchedulerConfig,
}

impl RenewalScheduler {
    pub fn new(
        subscriptions: Arc<dyn RelationalStore<Subscription>>,
        precalc: Arc<PrecalcRepository>,
        engine: Arc<RoutingEngine>,
        config: SchedulerConfig,
    ) -> Self {
        RenewalScheduler {
            subscriptions,
            precalc,
            engine,
            config,
        }
    }

    /// Runs forever until `shutdown` fires. Cooperative: a signal received
    /// mid-tick is only acted on once the subscription currently being
    /// processed has finished.
    pub async fn run(&self, mut shutdown: NotifyOnce) {
        loop {
            tokio::select! {
                biased;
                () = shutdown.recv() => break,
                () = tokio::time::sleep(self.config.tick_interval) => {
                    self.tick(&shutdown).await;
                }
            }
        }
    }

    async fn tick(&self, shutdown: &NotifyOnce) {
        let now = router_core::now_utc();
        let until = now + self.config.lookahead;

        let due = self
            .subscriptions
            .query(&|sub: &Subscription| sub.is_due_within(now, until))
            .await;

        let due = match due {
            Ok(subs) => subs,
            Err(err) => {
                warn!(error = %err, "failed to read upcoming subscriptions, skipping this tick");
                return;
            }
        };

        for subscription in due {
            if let Err(err) = self.precalculate(&subscription).await {
                warn!(
                    error = %err,
                    subscription_id = %subscription.id,
                    "failed to pre-calculate route for subscription, continuing with the rest of the tick"
                );
            }

            if shutdown.try_recv() {
                break;
            }
        }
    }

    async fn precalculate(&self, subscription: &Subscription) -> router_core::RouterResult<()> {
        let request = ChargeRequest {
            merchant_id: subscription.merchant_id.clone(),
            customer_id: subscription.customer_id.clone(),
            amount: subscription.amount,
            currency: subscription.currency.clone(),
            description: format!("Pre-calculation for renewal of sub {}", subscription.id),
            provider: None,
            subscription_id: Some(subscription.id.clone()),
            context: None,
        };

        let outcome = self.engine.find_best_route(&request).await?;
        let route = PrecalculatedRoute::new(
            subscription.id.clone(),
            outcome.provider,
            outcome.audit,
            subscription.next_renewal_at + PRECALC_VALIDITY_BEYOND_RENEWAL,
        );
        self.precalc.save(route).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use router_core::{
        now_utc, InMemoryBinMetadataProvider, InMemoryKeyValueStore, InMemoryRelationalStore,
        StaticHealthSnapshot, SubscriptionStatus,
    };
    use router_intel::IntelligenceRepository;
    use router_reconcile::FeeTable;
    use router_strategy::DeterministicLeastCostStrategy;
    use rust_decimal_macros::dec;

    fn subscription(id: &str, next_renewal_at: chrono::DateTime<chrono::Utc>) -> Subscription {
        Subscription {
            id: id.to_string(),
            customer_id: "c1".to_string(),
            merchant_id: "m1".to_string(),
            amount: dec!(10),
            currency: "USD".to_string(),
            next_renewal_at,
            status: SubscriptionStatus::Active,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    fn scheduler(subscriptions: Arc<dyn RelationalStore<Subscription>>) -> RenewalScheduler {
        let engine = Arc::new(RoutingEngine::new(
            FeeTable::new(vec![]),
            Arc::new(IntelligenceRepository::new(InMemoryKeyValueStore::new())),
            Arc::new(InMemoryBinMetadataProvider::new()),
            Arc::new(StaticHealthSnapshot::new()),
            Arc::new(DeterministicLeastCostStrategy),
            Arc::new(DeterministicLeastCostStrategy),
        ));
        RenewalScheduler::new(
            subscriptions,
            Arc::new(PrecalcRepository::new(InMemoryKeyValueStore::new())),
            engine,
            SchedulerConfig::default(),
        )
    }

    #[tokio::test]
    async fn due_subscription_gets_a_precalculated_route() {
        let store: Arc<InMemoryRelationalStore<Subscription>> = InMemoryRelationalStore::new();
        store
            .save("sub1".to_string(), subscription("sub1", now_utc() + chrono::Duration::days(1)))
            .await
            .unwrap();

        let scheduler = scheduler(store);
        scheduler.tick(&NotifyOnce::new()).await;

        let route = scheduler.precalc.find_valid("sub1").await.unwrap();
        assert!(route.is_some());
    }

    #[tokio::test]
    async fn subscription_outside_lookahead_is_skipped() {
        let store: Arc<InMemoryRelationalStore<Subscription>> = InMemoryRelationalStore::new();
        store
            .save(
                "sub1".to_string(),
                subscription("sub1", now_utc() + chrono::Duration::days(30)),
            )
            .await
            .unwrap();

        let scheduler = scheduler(store);
        scheduler.tick(&NotifyOnce::new()).await;

        assert!(scheduler.precalc.find_valid("sub1").await.unwrap().is_none());
    }
}
