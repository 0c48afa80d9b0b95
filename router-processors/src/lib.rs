//! Processor registry and per-provider adapter stubs.

pub mod adapter;
pub mod registry;

pub use adapter::{AdyenAdapter, BraintreeAdapter, InternalAdapter, ProcessorAdapter, StripeAdapter};
pub use registry::ProcessorRegistry;
