//! The planner itself: plan generation and bounded plan execution,
//! grounded on the original's `routing/decisioning/planner.py`.
//!
//! Modeled as an explicit finite graph (planner → specialists →
//! supervisor → critic), not open-ended recursion: the plan is a list of
//! steps drawn from a fixed, registered capability set, so execution time
//! is bounded by that set's size.

use std::collections::BTreeMap;
use std::sync::Arc;

use router_core::{RouterError, RouterResult};
use serde::Deserialize;
use serde_json::Value;

use crate::llm::{parse_json_object, ChatMessage, LlmClient};
use crate::planner::context::PlannerContext;
use crate::planner::specialists::{CostAnalyst, HealthSentinel, NetworkIntelligence, PerformanceAnalyst, Specialist};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    pub agent: String,
    pub reason: String,
}

/// The specialist capabilities the planner is allowed to schedule.
/// `Critic` is deliberately excluded: it is never part of a generated
/// plan, only invoked afterward by `PlannerRoutingStrategy` itself.
pub struct Planner {
    capabilities: BTreeMap<&'static str, Arc<dyn Specialist>>,
}

impl Planner {
    pub fn new() -> Self {
        let mut capabilities: BTreeMap<&'static str, Arc<dyn Specialist>> = BTreeMap::new();
        capabilities.insert("CostAnalyst", Arc::new(CostAnalyst));
        capabilities.insert("PerformanceAnalyst", Arc::new(PerformanceAnalyst));
        capabilities.insert("NetworkIntelligence", Arc::new(NetworkIntelligence));
        capabilities.insert("HealthSentinel", Arc::new(HealthSentinel));
        Planner { capabilities }
    }

    fn capability_descriptions(&self) -> String {
        self.capabilities
            .keys()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Asks the planner LLM for an ordered list of specialist steps, then
    /// drops any step naming a capability outside the registered set. The
    /// plan's length is bounded by that set regardless of what the LLM
    /// returns.
    pub async fn generate_plan(
        &self,
        client: &dyn LlmClient,
        model: &str,
        objective: &str,
        context: &PlannerContext,
    ) -> RouterResult<Vec<PlanStep>> {
        let transaction_json = serde_json::to_string(&context.payment)
            .map_err(|e| RouterError::StrategyFailure(e.to_string()))?;

        let prompt = format!(
            "You are a Routing Planner for a payment engine.\n\
             Objective: {objective}\nTransaction: {transaction_json}\n\n\
             Available Capabilities:\n{}\n\n\
             Generate a step-by-step execution plan to reach the routing decision.\n\
             Return a JSON object with a 'plan' key containing a list of steps.\n\
             Each step must have: 'agent' (name of the capability) and 'reason'.",
            self.capability_descriptions(),
        );

        let messages = [ChatMessage::user(prompt)];
        let response = client.chat(model, &messages).await?;
        let parsed = parse_json_object(&response)?;

        let raw_steps = parsed
            .get("plan")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut steps = Vec::new();
        for raw in raw_steps {
            if let Ok(step) = serde_json::from_value::<PlanStep>(raw) {
                if self.capabilities.contains_key(step.agent.as_str()) {
                    steps.push(step);
                }
            }
        }
        Ok(steps)
    }

    /// Runs each planned step in order, writing one evidence entry per
    /// agent. A step naming an unregistered capability is silently
    /// skipped (already filtered out by `generate_plan`, but kept
    /// defensive for hand-built plans such as the Critic pass).
    pub async fn execute_plan(
        &self,
        client: &dyn LlmClient,
        model: &str,
        plan: &[PlanStep],
        context: &mut PlannerContext,
    ) -> RouterResult<()> {
        for step in plan {
            if let Some(specialist) = self.capabilities.get(step.agent.as_str()) {
                let verdict = specialist.run(client, model, context).await?;
                context.evidence.insert(step.agent.clone(), verdict);
            }
        }
        Ok(())
    }

    /// Runs a single ad hoc specialist not drawn from the registered
    /// plan-selectable set, used for the Critic pass.
    pub async fn run_one(
        &self,
        client: &dyn LlmClient,
        model: &str,
        specialist: &dyn Specialist,
        context: &PlannerContext,
    ) -> RouterResult<Value> {
        specialist.run(client, model, context).await
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}
