//! Subscriptions and their pre-calculated routes, grounded on the
//! original's `core/models/subscription.py` and
//! `core/models/precalculated_route.py`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::provider::Provider;
use crate::time::{is_expired, now_utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    pub merchant_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub next_renewal_at: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_due_within(&self, now: DateTime<Utc>, until: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active
            && self.next_renewal_at >= now
            && self.next_renewal_at <= until
    }
}

/// A cached routing decision computed ahead of a subscription's renewal.
/// At most one row per `subscription_id`; saving upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecalculatedRoute {
    pub subscription_id: String,
    pub provider: Provider,
    pub routing_decision: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PrecalculatedRoute {
    pub fn new(
        subscription_id: impl Into<String>,
        provider: Provider,
        routing_decision: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        PrecalculatedRoute {
            subscription_id: subscription_id.into(),
            provider,
            routing_decision: routing_decision.into(),
            expires_at,
            created_at: now_utc(),
        }
    }

    /// Whether this row is still usable. Expired rows are logically
    /// invalid even before any deletion sweep removes them; no separate
    /// garbage-collection pass is required for correctness.
    pub fn is_valid(&self) -> bool {
        !is_expired(self.expires_at)
    }
}
