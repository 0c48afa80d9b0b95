//! The Provider Reconciler, grounded on the original's router
//! preprocessing step, deliberately cut free of its cyclic coupling to
//! the decision loop and expressed as a pure function instead.

use router_core::{HealthSnapshot, PerformanceMetrics, ProviderHealth, ProviderPerformance, ResolvedProvider, RoutingDimension};

use crate::fee::FeeTable;

/// Merges the static fee table, dimensioned performance, and a health
/// snapshot into a uniform per-decision view. Pure with respect to its
/// three inputs (fees, performance, health); the only I/O is the health
/// snapshot read, performed by the caller before invoking this.
pub struct Reconciler<'a> {
    fee_table: &'a FeeTable,
}

impl<'a> Reconciler<'a> {
    pub fn new(fee_table: &'a FeeTable) -> Self {
        Reconciler { fee_table }
    }

    /// Merge priority, descending:
    /// 1. A performance record for `(dimension, provider)` contributes
    ///    cost and observed metrics.
    /// 2. A provider in the fee table with no performance row gets
    ///    synthesized default metrics.
    /// 3. A provider whose health is `Down` is excluded entirely.
    pub async fn resolve(
        &self,
        dimension: &RoutingDimension,
        performance: &[ProviderPerformance],
        health: &dyn HealthSnapshot,
    ) -> Vec<ResolvedProvider> {
        let mut resolved = Vec::new();

        for provider in self.fee_table.providers() {
            if health.status(provider).await == ProviderHealth::Down {
                continue;
            }

            let metrics: PerformanceMetrics = if let Some(perf) = performance
                .iter()
                .find(|row| row.provider == provider && &row.dimension == dimension)
            {
                perf.metrics
            } else {
                let cost_structure = self.fee_table.resolve(
                    provider,
                    &dimension.network,
                    &dimension.card_type,
                    &dimension.region,
                );
                let Some(cost_structure) = cost_structure else {
                    continue;
                };
                PerformanceMetrics::synthesized(cost_structure)
            };

            resolved.push(ResolvedProvider {
                provider,
                fixed_fee: metrics.cost_structure.fixed_fee,
                variable_fee_percent: metrics.cost_structure.variable_fee_percent,
                auth_rate: metrics.auth_rate,
                avg_latency_ms: metrics.avg_latency_ms,
            });
        }

        resolved
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use router_core::{CostStructure, Provider, StaticHealthSnapshot};
    use rust_decimal_macros::dec;

    use crate::fee::FeeStructure;

    fn table() -> FeeTable {
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
        ])
    }

    #[tokio::test]
    async fn down_provider_is_excluded() {
        let fee_table = table();
        let reconciler = Reconciler::new(&fee_table);
        let health = StaticHealthSnapshot::new().with_down(Provider::Adyen);

        let resolved = reconciler
            .resolve(&RoutingDimension::unknown(), &[], &health)
            .await;

        assert!(resolved.iter().all(|p| p.provider != Provider::Adyen));
        assert_eq!(resolved.len(), 1);
    }

    #[tokio::test]
    async fn performance_record_overrides_synthesized_defaults() {
        let fee_table = table();
        let reconciler = Reconciler::new(&fee_table);
        let dimension = RoutingDimension::unknown();
        let health = StaticHealthSnapshot::new();

        let performance = vec![ProviderPerformance {
            provider: Provider::Stripe,
            dimension: dimension.clone(),
            metrics: PerformanceMetrics {
                auth_rate: 0.99,
                fraud_rate: 0.001,
                avg_latency_ms: 120,
                cost_structure: CostStructure {
                    variable_fee_percent: dec!(2.9),
                    fixed_fee: dec!(0.30),
                    interchange_plus_basis_points: dec!(0),
                },
            },
            data_window: "batch".to_string(),
        }];

        let resolved = reconciler.resolve(&dimension, &performance, &health).await;
        let stripe = resolved
            .iter()
            .find(|p| p.provider == Provider::Stripe)
            .unwrap();
        assert_eq!(stripe.auth_rate, 0.99);
        assert_eq!(stripe.avg_latency_ms, 120);
    }

    #[tokio::test]
    async fn no_performance_synthesizes_defaults() {
        let fee_table = table();
        let reconciler = Reconciler::new(&fee_table);
        let health = StaticHealthSnapshot::new();

        let resolved = reconciler
            .resolve(&RoutingDimension::unknown(), &[], &health)
            .await;
        let adyen = resolved
            .iter()
            .find(|p| p.provider == Provider::Adyen)
            .unwrap();
        assert_eq!(adyen.auth_rate, 0.95);
        assert_eq!(adyen.avg_latency_ms, 300);
    }
}
