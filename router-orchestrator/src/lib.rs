//! The Charge Orchestrator: merchant/customer existence checks, pre-calc
//! lookup, routing engine delegation, adapter dispatch, and feedback
//! emission.

pub mod directory;
pub mod orchestrator;
pub mod precalc;

pub use directory::{CustomerDirectory, InMemoryCustomerDirectory, InMemoryMerchantDirectory, MerchantDirectory};
pub use orchestrator::{ChargeOrchestrator, ENGINE_UNAVAILABLE_AUDIT, ENGINE_UNAVAILABLE_DEFAULT};
pub use precalc::PrecalcRepository;
