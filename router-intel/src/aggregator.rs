//! The Aggregator, grounded on the original's
//! `routing/decisioning/strategies.py` (`StaticAggregationStrategy`).

use std::collections::HashMap;

use router_core::{
    CostStructure, PerformanceMetrics, ProviderPerformance, RawTransactionRecord, RoutingDimension,
};
use rust_decimal::Decimal;

/// Folds a batch of raw transaction records into performance metrics
/// grouped by `(provider, dimension)`. Pure and deterministic: re-running
/// on the same multiset of records, in any order, yields identical output.
pub struct Aggregator {
    default_cost_structure: CostStructure,
    /// Extra-field keys to promote into `RoutingDimension::extras`,
    /// producing finer-grained buckets (e.g. `["merchant_category"]`).
    dynamic_dimension_fields: Vec<String>,
}

/// Placeholder fraud rate used until records carry real fraud signal.
const PLACEHOLDER_FRAUD_RATE: f64 = 0.01;

impl Aggregator {
    pub fn new(default_cost_structure: CostStructure) -> Self {
        Aggregator {
            default_cost_structure,
            dynamic_dimension_fields: Vec::new(),
        }
    }

    pub fn with_dynamic_dimension_fields(mut self, fields: Vec<String>) -> Self {
        self.dynamic_dimension_fields = fields;
        self
    }

    fn dimension_for(&self, record: &RawTransactionRecord) -> RoutingDimension {
        let mut dimension = RoutingDimension {
            payment_method_type: "credit_card".to_string(),
            payment_form: record.payment_form.clone(),
            network: record.network.clone(),
            card_type: record.card_type.clone(),
            region: record.region.clone(),
            currency: record.currency.clone(),
            network_tokenized: false,
            extras: Default::default(),
        };

        for field in &self.dynamic_dimension_fields {
            if let Some(value) = record.extra_fields.get(field) {
                dimension = dimension.with_extra(field.clone(), value.clone());
            }
        }

        dimension
    }

    /// Empty input produces no output groups; a group with zero records is
    /// impossible by construction, so there is no division-by-zero case to
    /// guard against.
    pub fn analyze(&self, records: &[RawTransactionRecord]) -> Vec<ProviderPerformance> {
        let mut grouped: HashMap<(router_core::Provider, RoutingDimension), Vec<&RawTransactionRecord>> =
            HashMap::new();

        for record in records {
            let dimension = self.dimension_for(record);
            grouped.entry((record.provider, dimension)).or_default().push(record);
        }

        let mut results: Vec<ProviderPerformance> = grouped
            .into_iter()
            .map(|((provider, dimension), group)| {
                let total = group.len() as u64;
                let succeeded = group.iter().filter(|r| r.succeeded()).count() as u64;
                let total_latency: u64 = group.iter().map(|r| r.latency_ms as u64).sum();

                let auth_rate = succeeded as f64 / total as f64;
                let avg_latency_ms = (total_latency / total) as u32;

                ProviderPerformance {
                    provider,
                    dimension,
                    metrics: PerformanceMetrics {
                        auth_rate,
                        fraud_rate: PLACEHOLDER_FRAUD_RATE,
                        avg_latency_ms,
                        cost_structure: self.default_cost_structure,
                    },
                    data_window: "batch".to_string(),
                }
            })
            .collect();

        // Stable output order makes test assertions and snapshot diffs
        // deterministic even though grouping goes through a HashMap.
        results.sort_by(|a, b| {
            a.provider
                .to_string()
                .cmp(&b.provider.to_string())
                .then_with(|| a.dimension.canonical_key().cmp(&b.dimension.canonical_key()))
        });
        results
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::new(CostStructure {
            variable_fee_percent: Decimal::new(29, 1),
            fixed_fee: Decimal::new(30, 2),
            interchange_plus_basis_points: Decimal::ZERO,
        })
    }
}


#[cfg(test)]
mod property_test {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use router_core::Provider;

    fn arb_record() -> impl Strategy<Value = RawTransactionRecord> {
        (
            proptest::sample::select(Provider::ALL.to_vec()),
            proptest::bool::ANY,
            1u32..2000,
        )
            .prop_map(|(provider, succeeded, latency_ms)| RawTransactionRecord {
                provider,
                payment_form: "card_on_file".to_string(),
                processing_type: "standard".to_string(),
                amount: Decimal::new(1000, 2),
                currency: "USD".to_string(),
                status: if succeeded { "succeeded" } else { "failed" }.to_string(),
                error_code: None,
                latency_ms,
                bin: "000000".to_string(),
                card_type: "credit".to_string(),
                network: "visa".to_string(),
                region: "domestic".to_string(),
                timestamp: Utc::now(),
                extra_fields: Default::default(),
            })
    }

    proptest! {
        /// `Aggregator.analyze` is a function of the record multiset, not
        /// the order records arrive in.
        #[test]
        fn analyze_is_order_independent(
            records in proptest::collection::vec(arb_record(), 0..30),
            shuffle_seed in proptest::collection::vec(any::<usize>(), 0..30),
        ) {
            let mut shuffled = records.clone();
            // Deterministic permutation derived from the seed vector, so
            // the test needs no external RNG and stays reproducible.
            for (i, seed) in shuffle_seed.iter().enumerate().take(shuffled.len()) {
                let j = seed % shuffled.len().max(1);
                shuffled.swap(i, j);
            }

            let original = Aggregator::default().analyze(&records);
            let permuted = Aggregator::default().analyze(&shuffled);
            prop_assert_eq!(original, permuted);
        }
    }
}
