//! The uniform processor adapter contract, grounded on the original's
//! `processors/interfaces.py` and the per-provider adapters under
//! `processors/adapters/`. Adapters never throw; transport failures map
//! to `Failure` with an `error_code` instead of an `Err`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use router_core::{ProcessorRequest, ProcessorResponse, ProcessorStatus};

#[async_trait]
pub trait ProcessorAdapter: Send + Sync {
    async fn charge(&self, request: &ProcessorRequest) -> ProcessorResponse;
    async fn refund(&self, processor_transaction_id: &str, amount: Decimal) -> ProcessorResponse;
    fn name(&self) -> &'static str;
}

fn synthesized_transaction_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Stub adapter: the interface is the contract for this spec, not the
/// body, so every adapter here returns a deterministic success with a
/// synthesized id rather than calling out to a real gateway.
macro_rules! stub_adapter {
    ($name:ident, $provider_name:expr, $tx_prefix:expr) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        #[async_trait]
        impl ProcessorAdapter for $name {
            async fn charge(&self, _request: &ProcessorRequest) -> ProcessorResponse {
                ProcessorResponse::success(synthesized_transaction_id($tx_prefix))
            }

            async fn refund(&self, _processor_transaction_id: &str, _amount: Decimal) -> ProcessorResponse {
                ProcessorResponse {
                    status: ProcessorStatus::Success,
                    processor_transaction_id: None,
                    error_code: None,
                    error_message: None,
                    raw_response: Default::default(),
                }
            }

            fn name(&self) -> &'static str {
                $provider_name
            }
        }
    };
}

stub_adapter!(StripeAdapter, "stripe", "pi_mock");
stub_adapter!(AdyenAdapter, "adyen", "ady_mock");
stub_adapter!(BraintreeAdapter, "braintree", "bt_mock");
stub_adapter!(InternalAdapter, "internal", "int_mock");
