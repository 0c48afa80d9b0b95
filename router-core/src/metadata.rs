//! BIN and interchange fee lookups, grounded on the original's
//! `core/models/metadata.py` and `core/repositories/metadata_repository.py`.
//! The data loaders themselves are out of scope; only the narrow shape the
//! Reconciler's dimension-derivation step reads through is kept.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Card BIN lookup result: brand → network, type → card_type, country →
/// region, as used by `RoutingEngine::find_best_route` step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBinMetadata {
    pub bin: String,
    pub brand: Option<String>,
    pub card_type: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait BinMetadataProvider: Send + Sync {
    async fn lookup(&self, bin: &str) -> Option<CardBinMetadata>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeFee {
    pub network: String,
    pub card_type: String,
    pub region: String,
    pub fee_percent: Decimal,
    pub fee_fixed: Decimal,
}

#[async_trait]
pub trait InterchangeFeeProvider: Send + Sync {
    async fn lookup(&self, network: &str, card_type: &str, region: &str)
        -> Option<InterchangeFee>;
}

/// Trivial in-memory stub sufficient for tests; real data loading lives
/// outside this crate.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBinMetadataProvider {
    by_bin: HashMap<String, CardBinMetadata>,
}

impl InMemoryBinMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, metadata: CardBinMetadata) -> Self {
        self.by_bin.insert(metadata.bin.clone(), metadata);
        self
    }
}

#[async_trait]
impl BinMetadataProvider for InMemoryBinMetadataProvider {
    async fn lookup(&self, bin: &str) -> Option<CardBinMetadata> {
        self.by_bin.get(bin).cloned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryInterchangeFeeProvider {
    fees: Vec<InterchangeFee>,
}

impl InMemoryInterchangeFeeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fee(mut self, fee: InterchangeFee) -> Self {
        self.fees.push(fee);
        self
    }
}

#[async_trait]
impl InterchangeFeeProvider for InMemoryInterchangeFeeProvider {
    async fn lookup(
        &self,
        network: &str,
        card_type: &str,
        region: &str,
    ) -> Option<InterchangeFee> {
        self.fees
            .iter()
            .find(|fee| fee.network == network && fee.card_type == card_type && fee.region == region)
            .cloned()
    }
}
