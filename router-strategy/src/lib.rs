//! Decision strategies: `Fixed`, `DeterministicLeastCost`, single-shot
//! LLM, and the multi-agent Planner with Critic.

pub mod llm;
pub mod llm_strategy;
pub mod planner;
pub mod planner_strategy;
pub mod strategy;

pub use llm::{ChatMessage, ChatRole, LlmClient};
pub use llm_strategy::LlmDecisionStrategy;
pub use planner_strategy::PlannerRoutingStrategy;
pub use strategy::{DecisionStrategy, DeterministicLeastCostStrategy, FixedStrategy};
