//! Shared concurrency primitives: structured task spawning with panic
//! propagation, and a "notify once" shutdown signal.
//!
//! The routing engine runs many independent charge requests concurrently
//! and one long-lived scheduler task, so it needs a "no orphaned tasks, no
//! swallowed panics" discipline.

pub mod notify_once;
pub mod task;

pub use notify_once::NotifyOnce;
pub use task::{join_tasks_and_shutdown, try_join_tasks_and_shutdown, Error, RouterTask};
