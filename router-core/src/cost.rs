//! Fee and performance models, grounded on the original's
//! `routing/decisioning/models.py` and `routing/preprocessing/models.py`
//! (`FeeStructure`, `PerformanceMetrics`, `ProviderPerformance`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dimension::RoutingDimension;
use crate::provider::Provider;

/// A provider's fee schedule. All fields non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostStructure {
    pub variable_fee_percent: Decimal,
    pub fixed_fee: Decimal,
    pub interchange_plus_basis_points: Decimal,
}

impl CostStructure {
    /// The expected total fee for a charge of `amount`: `fixed_fee +
    /// amount * variable_fee_percent / 100`. The single cost formula the
    /// engine and the reconciler both use, so they never disagree.
    pub fn total_cost(&self, amount: Decimal) -> Decimal {
        self.fixed_fee + amount * self.variable_fee_percent / Decimal::from(100)
    }
}

/// Observed (or defaulted) performance for a provider within a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Fraction of charges authorized, in `[0, 1]`.
    pub auth_rate: f64,
    /// Fraction of charges later flagged fraudulent, in `[0, 1]`.
    pub fraud_rate: f64,
    pub avg_latency_ms: u32,
    pub cost_structure: CostStructure,
}

impl PerformanceMetrics {
    /// The synthesized defaults used by the reconciler when no performance
    /// row exists for a provider that does appear in the static fee table.
    pub fn synthesized(cost_structure: CostStructure) -> Self {
        PerformanceMetrics {
            auth_rate: 0.95,
            fraud_rate: 0.01,
            avg_latency_ms: 300,
            cost_structure,
        }
    }
}

/// A single row of the Intelligence Repository: at most one per
/// `(provider, dimension)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPerformance {
    pub provider: Provider,
    pub dimension: RoutingDimension,
    pub metrics: PerformanceMetrics,
    pub data_window: String,
}

/// Per-decision materialized view of a candidate provider. Produced fresh
/// by the Reconciler on every routing call; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub fixed_fee: Decimal,
    pub variable_fee_percent: Decimal,
    pub auth_rate: f64,
    pub avg_latency_ms: u32,
}

impl ResolvedProvider {
    /// The expected total fee for a charge of `amount`, used directly by
    /// `DeterministicLeastCost`.
    pub fn total_cost(&self, amount: Decimal) -> Decimal {
        self.fixed_fee + amount * self.variable_fee_percent / Decimal::from(100)
    }
}
