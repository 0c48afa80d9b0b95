//! `Payment` and its state machine, grounded on the original's
//! `core/models/payment.py`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RouterError, RouterResult};
use crate::provider::Provider;
use crate::time::now_utc;

/// The lifecycle states of a `Payment`. Legal transitions are enforced by
/// [`Payment::transition_to`]; every other transition is a
/// [`RouterError::Validation`].
///
/// ```text
///  Pending ──(authorize)──▶ Authorized ──(settle)──▶ Completed
///     │                          │
///     ├─(cancel)──▶ Cancelled    └─(cancel)──▶ Cancelled
///     └─(processor failure)──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Authorized,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Whether `self` is a terminal state that rejects further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Cancelled
        )
    }

    fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Pending, Authorized)
                | (Pending, Failed)
                | (Pending, Cancelled)
                | (Authorized, Completed)
                | (Authorized, Cancelled)
        )
    }
}

/// A request to charge a customer, optionally enriched by orchestration
/// before it reaches the routing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub merchant_id: String,
    pub customer_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    /// An explicit provider override. When set, the routing engine
    /// returns it without consulting any strategy.
    pub provider: Option<Provider>,
    pub subscription_id: Option<String>,
    pub context: Option<RequestContext>,
}

impl ChargeRequest {
    pub fn validate(&self) -> RouterResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(RouterError::Validation(
                "charge amount must be non-negative".to_string(),
            ));
        }
        if self.currency.is_empty() {
            return Err(RouterError::Validation(
                "currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Enrichment populated by orchestration before a request reaches the
/// routing engine: BIN metadata, interchange fees, provider health, and
/// payment method hints used to derive a `RoutingDimension` and consumed
/// directly by the Planner strategy's specialists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub payment_method_type: Option<String>,
    pub payment_form: Option<String>,
    /// The card's leading digits. When `bin_metadata` isn't already
    /// resolved, the routing engine looks this up via a
    /// `BinMetadataProvider` before deriving the routing dimension.
    pub card_bin: Option<String>,
    pub card_brand: Option<String>,
    pub card_type: Option<String>,
    pub country: Option<String>,
    pub network_tokenized: Option<bool>,
    pub bin_metadata: Option<crate::metadata::CardBinMetadata>,
    #[serde(default)]
    pub interchange_fees: Vec<crate::metadata::InterchangeFee>,
    #[serde(default)]
    pub provider_health: std::collections::BTreeMap<String, String>,
}

/// The persisted result of a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub merchant_id: String,
    pub customer_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider: Option<Provider>,
    pub processor_transaction_id: Option<String>,
    pub routing_decision: Option<String>,
    pub subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new `Pending` payment from a validated request.
    pub fn new_pending(request: &ChargeRequest) -> Self {
        let now = now_utc();
        Payment {
            id: Uuid::new_v4(),
            merchant_id: request.merchant_id.clone(),
            customer_id: request.customer_id.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            status: PaymentStatus::Pending,
            provider: None,
            processor_transaction_id: None,
            routing_decision: None,
            subscription_id: request.subscription_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a state transition, rejecting anything not in the legal
    /// transition table.
    pub fn transition_to(&mut self, next: PaymentStatus) -> RouterResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(RouterError::Validation(format!(
                "illegal payment transition {:?} -> {:?}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = now_utc();
        Ok(())
    }

    /// Assigns the routing outcome. Once a processor transaction id is
    /// set it is never rewritten: the `(provider, processor_transaction_id)`
    /// pair is a permanent audit fact about this payment.
    pub fn assign_route(
        &mut self,
        provider: Provider,
        processor_transaction_id: Option<String>,
        routing_decision: impl Into<String>,
    ) -> RouterResult<()> {
        if self.processor_transaction_id.is_some() && processor_transaction_id.is_some() {
            return Err(RouterError::Conflict(
                "processor transaction id is already set on this payment".to_string(),
            ));
        }
        self.provider = Some(provider);
        if processor_transaction_id.is_some() {
            self.processor_transaction_id = processor_transaction_id;
        }
        self.routing_decision = Some(routing_decision.into());
        self.updated_at = now_utc();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_request() -> ChargeRequest {
        ChargeRequest {
            merchant_id: "m1".to_string(),
            customer_id: "c1".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            description: "test".to_string(),
            provider: None,
            subscription_id: None,
            context: None,
        }
    }

    #[test]
    fn legal_transitions_succeed() {
        let mut payment = Payment::new_pending(&sample_request());
        payment.transition_to(PaymentStatus::Authorized).unwrap();
        payment.transition_to(PaymentStatus::Completed).unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut payment = Payment::new_pending(&sample_request());
        payment.transition_to(PaymentStatus::Failed).unwrap();
        assert!(payment.transition_to(PaymentStatus::Authorized).is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut request = sample_request();
        request.amount = dec!(-1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn processor_transaction_id_is_never_rewritten() {
        let mut payment = Payment::new_pending(&sample_request());
        payment
            .assign_route(Provider::Stripe, Some("tx_1".to_string()), "Fixed")
            .unwrap();
        let err = payment
            .assign_route(Provider::Adyen, Some("tx_2".to_string()), "Fixed")
            .unwrap_err();
        assert!(matches!(err, RouterError::Conflict(_)));
        assert_eq!(payment.processor_transaction_id.as_deref(), Some("tx_1"));
    }
}
