//! The Routing Engine: dimension derivation, reconciliation, strategy
//! delegation, and a two-layer circuit breaker to an ultimate default.

pub mod dimension;
pub mod engine;

pub use dimension::derive_dimension;
pub use engine::{RoutingEngine, RoutingOutcome, ULTIMATE_DEFAULT_AUDIT, ULTIMATE_DEFAULT_PROVIDER};
