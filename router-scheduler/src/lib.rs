//! The Renewal Scheduler: a long-lived task that scans upcoming
//! subscription renewals and pre-computes their route.

pub mod scheduler;

pub use scheduler::{RenewalScheduler, SchedulerConfig};
