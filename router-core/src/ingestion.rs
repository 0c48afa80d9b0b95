//! Canonical ingestion row, grounded on the original's
//! `routing/ingestion/models.py` and the Stripe CSV `parsers.py`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// A canonical, append-only ingestion row. Produced by batch report
/// parsers and by the feedback collector alike, so the aggregator sees a
/// single uniform shape regardless of source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransactionRecord {
    pub provider: Provider,
    pub payment_form: String,
    pub processing_type: String,
    pub amount: Decimal,
    pub currency: String,
    /// `"succeeded"`, `"failed"`, or another provider-reported status.
    pub status: String,
    pub error_code: Option<String>,
    pub latency_ms: u32,
    pub bin: String,
    pub card_type: String,
    pub network: String,
    pub region: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
}

impl RawTransactionRecord {
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}
