//! Domain model, error taxonomy, datastore interfaces, and time utilities
//! shared by every other crate in the routing engine.

pub mod cost;
pub mod dimension;
pub mod error;
pub mod health;
pub mod ingestion;
pub mod metadata;
pub mod payment;
pub mod processor;
pub mod provider;
pub mod store;
pub mod subscription;
pub mod time;

pub use cost::{CostStructure, PerformanceMetrics, ProviderPerformance, ResolvedProvider};
pub use dimension::RoutingDimension;
pub use error::{RouterError, RouterResult};
pub use health::{HealthSnapshot, ProviderHealth, StaticHealthSnapshot};
pub use ingestion::RawTransactionRecord;
pub use metadata::{
    BinMetadataProvider, CardBinMetadata, InMemoryBinMetadataProvider,
    InMemoryInterchangeFeeProvider, InterchangeFee, InterchangeFeeProvider,
};
pub use payment::{ChargeRequest, Payment, PaymentStatus, RequestContext};
pub use processor::{ProcessorRequest, ProcessorResponse, ProcessorStatus};
pub use provider::Provider;
pub use store::{
    InMemoryKeyValueStore, InMemoryLogAppendStore, InMemoryRelationalStore, KeyValueStore,
    LogAppendStore, RelationalStore,
};
pub use subscription::{PrecalculatedRoute, Subscription, SubscriptionStatus};
pub use time::{is_expired, normalize_to_utc, now_utc};
