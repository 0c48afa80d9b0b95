//! The Provider Reconciler: static fees + dimensioned performance + health
//! into a uniform `ResolvedProvider` view.

pub mod fee;
pub mod reconciler;

pub use fee::{FeeStructure, FeeTable};
pub use reconciler::Reconciler;
