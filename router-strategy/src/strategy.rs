//! The decision strategy contract and the two pure strategies, grounded
//! on the original's `routing/decisioning/decision_strategies.py`.

use async_trait::async_trait;
use router_core::{ChargeRequest, Provider, ResolvedProvider, RouterResult};

/// The pure operation every decision strategy exposes: `(request,
/// resolvedProviders) -> Provider`.
#[async_trait]
pub trait DecisionStrategy: Send + Sync {
    async fn decide(
        &self,
        request: &ChargeRequest,
        providers: &[ResolvedProvider],
    ) -> RouterResult<Provider>;

    /// The name recorded in a payment's routing decision audit string.
    fn name(&self) -> &'static str;
}

/// Always returns a configured provider, ignoring the reconciled list.
/// Used for overrides and tests.
pub struct FixedStrategy {
    provider: Provider,
}

impl FixedStrategy {
    pub fn new(provider: Provider) -> Self {
        FixedStrategy { provider }
    }
}

#[async_trait]
impl DecisionStrategy for FixedStrategy {
    async fn decide(
        &self,
        _request: &ChargeRequest,
        _providers: &[ResolvedProvider],
    ) -> RouterResult<Provider> {
        Ok(self.provider)
    }

    fn name(&self) -> &'static str {
        "Fixed"
    }
}

/// `total_cost(p) = p.fixed_fee + amount * p.variable_fee_percent / 100`.
/// Returns the argmin; ties broken by [`Provider::ALL`]'s stable order.
/// No network or external state, so this never suspends and is
/// idempotent and order-independent on its input by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicLeastCostStrategy;

#[async_trait]
impl DecisionStrategy for DeterministicLeastCostStrategy {
    async fn decide(
        &self,
        request: &ChargeRequest,
        providers: &[ResolvedProvider],
    ) -> RouterResult<Provider> {
        if providers.is_empty() {
            return Ok(Provider::Stripe);
        }

        let mut best: Option<&ResolvedProvider> = None;
        for candidate in providers {
            let candidate_cost = candidate.total_cost(request.amount);
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    let current_cost = current.total_cost(request.amount);
                    if candidate_cost < current_cost {
                        candidate
                    } else if candidate_cost == current_cost {
                        tie_break(current, candidate)
                    } else {
                        current
                    }
                }
            });
        }

        Ok(best.expect("providers is non-empty").provider)
    }

    fn name(&self) -> &'static str {
        "DeterministicLeastCost"
    }
}

fn tie_break<'a>(a: &'a ResolvedProvider, b: &'a ResolvedProvider) -> &'a ResolvedProvider {
    let stable_order = Provider::ALL;
    let a_index = stable_order.iter().position(|p| *p == a.provider);
    let b_index = stable_order.iter().position(|p| *p == b.provider);
    if a_index <= b_index {
        a
    } else {
        b
    }
}


#[cfg(test)]
mod property_test {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn request(amount: Decimal) -> ChargeRequest {
        ChargeRequest {
            merchant_id: "m1".to_string(),
            customer_id: "c1".to_string(),
            amount,
            currency: "USD".to_string(),
            description: "test".to_string(),
            provider: None,
            subscription_id: None,
            context: None,
        }
    }

    fn arb_resolved_provider(provider: Provider) -> impl Strategy<Value = ResolvedProvider> {
        (0u32..500, 0u32..500, 1u32..1000).prop_map(move |(fixed_cents, variable_bps, latency)| {
            ResolvedProvider {
                provider,
                fixed_fee: Decimal::new(fixed_cents as i64, 2),
                variable_fee_percent: Decimal::new(variable_bps as i64, 2),
                auth_rate: 0.95,
                avg_latency_ms: latency,
            }
        })
    }

    fn arb_providers() -> impl Strategy<Value = Vec<ResolvedProvider>> {
        proptest::collection::vec(
            proptest::sample::select(Provider::ALL.to_vec()).prop_flat_map(arb_resolved_provider),
            0..Provider::ALL.len(),
        )
    }

    proptest! {
        /// `DeterministicLeastCost` is idempotent and order-independent
        /// on its input.
        #[test]
        fn decision_is_order_independent(providers in arb_providers(), amount_cents in 1i64..100_000) {
            let amount = Decimal::new(amount_cents, 2);
            let request = request(amount);
            let mut shuffled = providers.clone();
            shuffled.reverse();

            let original = tokio_test::block_on(DeterministicLeastCostStrategy.decide(&request, &providers)).unwrap();
            let reversed = tokio_test::block_on(DeterministicLeastCostStrategy.decide(&request, &shuffled)).unwrap();
            prop_assert_eq!(original, reversed);
        }

        /// Re-running on the same input always yields the same decision.
        #[test]
        fn decision_is_idempotent(providers in arb_providers(), amount_cents in 1i64..100_000) {
            let amount = Decimal::new(amount_cents, 2);
            let request = request(amount);

            let first = tokio_test::block_on(DeterministicLeastCostStrategy.decide(&request, &providers)).unwrap();
            let second = tokio_test::block_on(DeterministicLeastCostStrategy.decide(&request, &providers)).unwrap();
            prop_assert_eq!(first, second);
        }

        /// The decision is always one of the candidates offered, or the
        /// documented empty-list fallback.
        #[test]
        fn decision_is_always_a_candidate_or_the_fallback(providers in arb_providers(), amount_cents in 1i64..100_000) {
            let amount = Decimal::new(amount_cents, 2);
            let request = request(amount);
            let decision = tokio_test::block_on(DeterministicLeastCostStrategy.decide(&request, &providers)).unwrap();

            if providers.is_empty() {
                prop_assert_eq!(decision, Provider::Stripe);
            } else {
                prop_assert!(providers.iter().any(|p| p.provider == decision));
            }
        }
    }
}
