//! A small set of error *kinds*, not a type per failure site.
//! `StrategyFailure` is always caught by the routing engine's circuit
//! breaker and never reaches a caller; every other variant propagates.

use thiserror::Error;

/// Errors surfaced by the routing engine's components.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A merchant, customer, payment, or subscription could not be found.
    /// Never retried.
    #[error("not found: {0}")]
    NotFound(String),

    /// A request violated a constraint (bad enum value, negative amount,
    /// illegal state transition). Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g. a duplicate processor
    /// transaction id for a provider).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A decision strategy failed (LLM error, timeout, malformed response).
    /// Callers should never see this: the routing engine catches it and
    /// falls back to `DeterministicLeastCost`.
    #[error("strategy failure: {0}")]
    StrategyFailure(String),

    /// A processor adapter returned a non-`Success` response. Recorded on
    /// the `Payment` as `Failed` and surfaced to the caller with that
    /// status; never retried by the core.
    #[error("processor failure: {0}")]
    ProcessorFailure(String),

    /// A datastore was unreachable or returned a malformed result. Surfaced
    /// as-is; the core never invents a decision in its place.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

pub type RouterResult<T> = Result<T, RouterError>;
