//! The specialist agents, grounded on the original's
//! `routing/decisioning/specialists.py`.

use async_trait::async_trait;
use router_core::{RouterError, RouterResult};
use serde_json::Value;

use crate::llm::{parse_json_object, ChatMessage, LlmClient};
use crate::planner::context::PlannerContext;

/// A capability the planner can schedule. Every specialist returns a
/// structured JSON verdict and writes nothing outside its own evidence
/// slot.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value>;
}

async fn ask(client: &dyn LlmClient, model: &str, prompt: String) -> RouterResult<Value> {
    let messages = [ChatMessage::user(prompt)];
    let response = client.chat(model, &messages).await?;
    parse_json_object(&response)
}

fn to_json(value: &impl serde::Serialize) -> RouterResult<String> {
    serde_json::to_string(value).map_err(|e| RouterError::StrategyFailure(e.to_string()))
}

/// Analyzes fee structures to find the cheapest provider.
pub struct CostAnalyst;

#[async_trait]
impl Specialist for CostAnalyst {
    fn name(&self) -> &'static str {
        "CostAnalyst"
    }

    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value> {
        let prompt = format!(
            "You are a Cost Analyst Agent for a payment system.\n\
             Analyze the resolved provider data and payment details to recommend the cheapest provider.\n\
             PROVIDERS: {}\nPAYMENT: {}\n\n\
             Return a JSON object: {{\"analysis\": \"...\", \"recommended_provider\": \"...\", \"confidence\": 0.0-1.0}}",
            to_json(&context.providers)?,
            to_json(&context.payment)?,
        );
        ask(client, model, prompt).await
    }
}

/// Analyzes authorization rates and latency to find the most reliable
/// provider.
pub struct PerformanceAnalyst;

#[async_trait]
impl Specialist for PerformanceAnalyst {
    fn name(&self) -> &'static str {
        "PerformanceAnalyst"
    }

    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value> {
        let prompt = format!(
            "You are a Performance Analyst Agent for a payment system.\n\
             Analyze the resolved provider data and recommend the most reliable provider.\n\
             PROVIDERS: {}\n\n\
             Return a JSON object: {{\"analysis\": \"...\", \"recommended_provider\": \"...\", \"confidence\": 0.0-1.0}}",
            to_json(&context.providers)?,
        );
        ask(client, model, prompt).await
    }
}

/// Analyzes BIN metadata and interchange fees for network-specific
/// optimizations.
pub struct NetworkIntelligence;

#[async_trait]
impl Specialist for NetworkIntelligence {
    fn name(&self) -> &'static str {
        "NetworkIntelligence"
    }

    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value> {
        let prompt = format!(
            "You are a Network Intelligence Agent.\n\
             Analyze the card metadata and interchange rules to identify cost optimization opportunities.\n\
             BIN METADATA: {}\nINTERCHANGE RULES: {}\nPAYMENT: {}\n\n\
             Return a JSON object: {{\"analysis\": \"...\", \"preferred_networks\": [...], \"routing_advice\": \"...\"}}",
            to_json(&context.bin_metadata)?,
            to_json(&context.interchange_fees)?,
            to_json(&context.payment)?,
        );
        ask(client, model, prompt).await
    }
}

/// Assesses real-time provider health status.
pub struct HealthSentinel;

#[async_trait]
impl Specialist for HealthSentinel {
    fn name(&self) -> &'static str {
        "HealthSentinel"
    }

    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value> {
        let prompt = format!(
            "You are a Health Sentinel Agent.\n\
             Assess the operational status of payment providers.\n\
             HEALTH STATUS: {}\n\n\
             Identify any providers that are DOWN or exhibiting degraded performance.\n\
             Return a JSON object: {{\"analysis\": \"...\", \"unhealthy_providers\": [...], \"critical_alerts\": [...]}}",
            to_json(&context.provider_health)?,
        );
        ask(client, model, prompt).await
    }
}

/// Reviews a proposed routing decision against hard safety rules. Always
/// invoked last, never scheduled by the planner's own plan.
pub struct Critic;

#[async_trait]
impl Specialist for Critic {
    fn name(&self) -> &'static str {
        "Critic"
    }

    async fn run(&self, client: &dyn LlmClient, model: &str, context: &PlannerContext) -> RouterResult<Value> {
        let prompt = format!(
            "You are a Routing Critic Agent.\n\
             Review the proposed routing decision and ensure it is safe and logical.\n\
             PROPOSED DECISION: {}\nAGENT EVIDENCE: {}\nPROVIDER HEALTH: {}\n\n\
             CRITICAL RULES:\n\
             1. Never route to a provider that is marked as DOWN.\n\
             2. If the proposed provider has significantly lower confidence in evidence, flag it.\n\n\
             Return a JSON object: {{\"is_valid\": true/false, \"feedback\": \"...\", \"recommended_override\": \"...\"}}",
            to_json(&context.proposed_decision)?,
            to_json(&context.evidence)?,
            to_json(&context.provider_health)?,
        );
        ask(client, model, prompt).await
    }
}
