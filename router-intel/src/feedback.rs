//! The Feedback Loop, grounded on the original's
//! `routing/decisioning/feedback.py`.

use async_trait::async_trait;
use router_core::{Payment, PaymentStatus, RawTransactionRecord, RouterResult};

use crate::aggregator::Aggregator;

/// Placeholder latency recorded until processor adapters report real
/// per-charge timing.
const PLACEHOLDER_LATENCY_MS: u32 = 250;

/// Staging list of records captured from completed payments, drained by a
/// separate tick rather than pushed synchronously into the aggregator, so
/// live charge latency is unaffected.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn add_record(&self, record: RawTransactionRecord) -> RouterResult<()>;
    async fn all_records(&self) -> RouterResult<Vec<RawTransactionRecord>>;
    async fn clear(&self) -> RouterResult<()>;
    /// Atomically takes every staged record and leaves the store empty, in
    /// one critical section. Callers that need "snapshot, then clear" must
    /// use this instead of `all_records` followed by `clear`: a record
    /// added by a concurrent `add_record` between those two calls would
    /// otherwise be wiped out by the `clear` without ever being seen.
    async fn drain(&self) -> RouterResult<Vec<RawTransactionRecord>>;
}

pub struct InMemoryFeedbackStore {
    records: tokio::sync::Mutex<Vec<RawTransactionRecord>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        InMemoryFeedbackStore {
            records: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn add_record(&self, record: RawTransactionRecord) -> RouterResult<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn all_records(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn clear(&self) -> RouterResult<()> {
        self.records.lock().await.clear();
        Ok(())
    }

    async fn drain(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        let mut guard = self.records.lock().await;
        Ok(std::mem::take(&mut *guard))
    }
}

#[async_trait]
impl<T> FeedbackStore for &T
where
    T: FeedbackStore + ?Sized,
{
    async fn add_record(&self, record: RawTransactionRecord) -> RouterResult<()> {
        (**self).add_record(record).await
    }

    async fn all_records(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        (**self).all_records().await
    }

    async fn clear(&self) -> RouterResult<()> {
        (**self).clear().await
    }

    async fn drain(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        (**self).drain().await
    }
}

#[async_trait]
impl<T> FeedbackStore for std::sync::Arc<T>
where
    T: FeedbackStore + ?Sized,
{
    async fn add_record(&self, record: RawTransactionRecord) -> RouterResult<()> {
        (**self).add_record(record).await
    }

    async fn all_records(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        (**self).all_records().await
    }

    async fn clear(&self) -> RouterResult<()> {
        (**self).clear().await
    }

    async fn drain(&self) -> RouterResult<Vec<RawTransactionRecord>> {
        (**self).drain().await
    }
}

/// Captures a terminal payment and converts it to a canonical ingestion
/// record.
#[async_trait]
pub trait FeedbackCollector: Send + Sync {
    async fn collect(&self, payment: &Payment) -> RouterResult<()>;
}

pub struct LocalFeedbackCollector<S> {
    store: S,
}

impl<S> LocalFeedbackCollector<S>
where
    S: FeedbackStore,
{
    pub fn new(store: S) -> Self {
        LocalFeedbackCollector { store }
    }
}

#[async_trait]
impl<S> FeedbackCollector for LocalFeedbackCollector<S>
where
    S: FeedbackStore,
{
    async fn collect(&self, payment: &Payment) -> RouterResult<()> {
        let canonical_status = if payment.status == PaymentStatus::Completed {
            "succeeded"
        } else {
            "failed"
        };

        let record = RawTransactionRecord {
            provider: payment.provider.unwrap_or(router_core::Provider::Internal),
            payment_form: "card_on_file".to_string(),
            processing_type: "standard".to_string(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            status: canonical_status.to_string(),
            error_code: if canonical_status == "succeeded" {
                None
            } else {
                Some("processor_error".to_string())
            },
            latency_ms: PLACEHOLDER_LATENCY_MS,
            bin: "000000".to_string(),
            card_type: "credit".to_string(),
            network: "visa".to_string(),
            region: "domestic".to_string(),
            timestamp: payment.updated_at,
            extra_fields: Default::default(),
        };

        self.store.add_record(record).await
    }
}

/// Fetch-all view over the feedback store, consumed by the aggregator as
/// just another batch source. Draining is a pull, on its own tick, and
/// runs concurrently with `add_record` calls from in-flight charges; it
/// goes through `FeedbackStore::drain` rather than a snapshot-then-clear
/// pair so a record added mid-drain is either included in this drain or
/// left for the next one, never lost.
pub struct InternalFeedbackDataProvider<'a, S> {
    store: &'a S,
}

impl<'a, S> InternalFeedbackDataProvider<'a, S>
where
    S: FeedbackStore,
{
    pub fn new(store: &'a S) -> Self {
        InternalFeedbackDataProvider { store }
    }

    /// Atomically drains the staged records and folds them into
    /// performance records via `aggregator`.
    pub async fn drain_into(
        &self,
        aggregator: &Aggregator,
    ) -> RouterResult<Vec<router_core::ProviderPerformance>> {
        let records = self.store.drain().await?;
        Ok(aggregator.analyze(&records))
    }
}
