pub mod context;
pub mod plan;
pub mod specialists;

pub use context::PlannerContext;
pub use plan::{PlanStep, Planner};
pub use specialists::{CostAnalyst, Critic, HealthSentinel, NetworkIntelligence, PerformanceAnalyst, Specialist};
