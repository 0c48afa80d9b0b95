//! The standardized adapter contract, grounded on the original's
//! `processors/models/gateway.py`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorStatus {
    Success,
    Failure,
    Pending,
    RequiresAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorRequest {
    pub amount: Decimal,
    pub currency: String,
    pub payment_method_token: String,
    pub merchant_id: String,
    pub customer_id: String,
    pub description: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorResponse {
    pub status: ProcessorStatus,
    pub processor_transaction_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub raw_response: BTreeMap<String, Value>,
}

impl ProcessorResponse {
    pub fn success(processor_transaction_id: impl Into<String>) -> Self {
        ProcessorResponse {
            status: ProcessorStatus::Success,
            processor_transaction_id: Some(processor_transaction_id.into()),
            error_code: None,
            error_message: None,
            raw_response: BTreeMap::new(),
        }
    }

    pub fn failure(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        ProcessorResponse {
            status: ProcessorStatus::Failure,
            processor_transaction_id: None,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
            raw_response: BTreeMap::new(),
        }
    }
}
