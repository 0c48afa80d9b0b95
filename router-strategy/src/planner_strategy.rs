//! The multi-agent Planner strategy, grounded on the original's
//! `PlannerRoutingStrategy`: plan → execute specialists → supervisor
//! synthesis → critic review, with the same circuit breaker to
//! `DeterministicLeastCost` the single-shot strategy uses.

use async_trait::async_trait;
use router_core::{ChargeRequest, Provider, ResolvedProvider, RouterError, RouterResult};
use tracing::{info, warn};

use crate::llm::{parse_json_object, ChatMessage, LlmClient};
use crate::planner::context::PlannerContext;
use crate::planner::plan::Planner;
use crate::planner::specialists::{Critic, Specialist};
use crate::strategy::{DecisionStrategy, DeterministicLeastCostStrategy};

pub struct PlannerRoutingStrategy<C> {
    client: C,
    planner: Planner,
    objective: String,
    model: String,
}

impl<C> PlannerRoutingStrategy<C>
where
    C: LlmClient,
{
    pub fn new(client: C, objective: impl Into<String>, model: impl Into<String>) -> Self {
        PlannerRoutingStrategy {
            client,
            planner: Planner::new(),
            objective: objective.into(),
            model: model.into(),
        }
    }

    async fn try_decide(
        &self,
        request: &ChargeRequest,
        providers: &[ResolvedProvider],
    ) -> RouterResult<Provider> {
        let mut context = PlannerContext::new(request.clone(), providers.to_vec());
        if let Some(ctx) = &request.context {
            if let Some(bin_metadata) = ctx.bin_metadata.clone() {
                context = context.with_bin_metadata(bin_metadata);
            }
            context = context
                .with_interchange_fees(ctx.interchange_fees.clone())
                .with_provider_health(ctx.provider_health.clone());
        }

        let plan = self
            .planner
            .generate_plan(&self.client, &self.model, &self.objective, &context)
            .await?;
        info!(steps = plan.len(), "generated routing plan");

        self.planner
            .execute_plan(&self.client, &self.model, &plan, &mut context)
            .await?;

        let payment_json = serde_json::to_string(&context.payment)
            .map_err(|e| RouterError::StrategyFailure(e.to_string()))?;
        let evidence_json = serde_json::to_string(&context.evidence)
            .map_err(|e| RouterError::StrategyFailure(e.to_string()))?;

        let synthesis_prompt = format!(
            "You are the Routing Supervisor.\nObjective: {}\nTransaction: {payment_json}\n\n\
             --- AGENT EVIDENCE ---\n{evidence_json}\n\n\
             --- INSTRUCTION ---\nBased on the technical evidence, propose the best provider.\n\
             Return ONLY a JSON object: {{\"best_provider\": \"...\", \"reasoning\": \"...\"}}",
            self.objective,
        );
        let response = self
            .client
            .chat(&self.model, &[ChatMessage::user(synthesis_prompt)])
            .await?;
        let proposal = parse_json_object(&response)?;
        context.proposed_decision = Some(proposal.clone());

        let critic_verdict = self
            .planner
            .run_one(&self.client, &self.model, &Critic, &context)
            .await?;

        let is_valid = critic_verdict
            .get("is_valid")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let override_name = critic_verdict
            .get("recommended_override")
            .and_then(|v| v.as_str());

        let final_provider_name = if !is_valid {
            if let Some(override_name) = override_name {
                warn!(
                    proposed = ?proposal.get("best_provider"),
                    override = override_name,
                    "critic override applied"
                );
                override_name.to_string()
            } else {
                proposal
                    .get("best_provider")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        RouterError::StrategyFailure("supervisor proposal missing best_provider".to_string())
                    })?
                    .to_string()
            }
        } else {
            proposal
                .get("best_provider")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    RouterError::StrategyFailure("supervisor proposal missing best_provider".to_string())
                })?
                .to_string()
        };

        Provider::parse_validated(&final_provider_name).ok_or_else(|| {
            RouterError::StrategyFailure(format!(
                "planner resolved unknown provider name {final_provider_name:?}"
            ))
        })
    }
}

#[async_trait]
impl<C> DecisionStrategy for PlannerRoutingStrategy<C>
where
    C: LlmClient,
{
    async fn decide(
        &self,
        request: &ChargeRequest,
        providers: &[ResolvedProvider],
    ) -> RouterResult<Provider> {
        match self.try_decide(request, providers).await {
            Ok(provider) => Ok(provider),
            Err(e) => {
                warn!(error = %e, "planner strategy failed, falling back to DeterministicLeastCost");
                DeterministicLeastCostStrategy.decide(request, providers).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "Planner"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use router_core::RequestContext;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns canned JSON responses keyed by call order, matching the
    /// original's "plan → specialists → supervisor → critic" sequence.
    struct ScriptedClient {
        responses: Mutex<Vec<&'static str>>,
        call_count: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(responses: Vec<&'static str>) -> Self {
            ScriptedClient {
                responses: Mutex::new(responses),
                call_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn chat(&self, _model: &str, _messages: &[ChatMessage]) -> RouterResult<String> {
            let index = self.call_count.fetch_add(1, Ordering::SeqCst);
            let responses = self.responses.lock().unwrap();
            responses
                .get(index)
                .map(|s| s.to_string())
                .ok_or_else(|| RouterError::StrategyFailure("no more scripted responses".to_string()))
        }
    }

    fn request_with_health(down: &str) -> ChargeRequest {
        let mut health = BTreeMap::new();
        health.insert(down.to_string(), "down".to_string());
        ChargeRequest {
            merchant_id: "m1".to_string(),
            customer_id: "c1".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            description: "test".to_string(),
            provider: None,
            subscription_id: None,
            context: Some(RequestContext {
                provider_health: health,
                ..Default::default()
            }),
        }
    }

    fn providers() -> Vec<ResolvedProvider> {
        vec![
            ResolvedProvider {
                provider: Provider::Stripe,
                fixed_fee: dec!(0.10),
                variable_fee_percent: dec!(0),
                auth_rate: 0.95,
                avg_latency_ms: 300,
            },
            ResolvedProvider {
                provider: Provider::Adyen,
                fixed_fee: dec!(0.05),
                variable_fee_percent: dec!(0),
                auth_rate: 0.95,
                avg_latency_ms: 300,
            },
        ]
    }

    #[tokio::test]
    async fn critic_override_replaces_proposal() {
        let client = ScriptedClient::new(vec![
            r#"{"plan": []}"#,
            r#"{"best_provider": "adyen", "reasoning": "cheapest"}"#,
            r#"{"is_valid": false, "feedback": "adyen is down", "recommended_override": "stripe"}"#,
        ]);
        let strategy = PlannerRoutingStrategy::new(client, "balanced", "gpt-4o");
        let decision = strategy
            .decide(&request_with_health("adyen"), &providers())
            .await
            .unwrap();
        assert_eq!(decision, Provider::Stripe);
    }

    #[tokio::test]
    async fn valid_proposal_is_used_as_is() {
        let client = ScriptedClient::new(vec![
            r#"{"plan": []}"#,
            r#"{"best_provider": "adyen", "reasoning": "cheapest"}"#,
            r#"{"is_valid": true, "feedback": "fine"}"#,
        ]);
        let strategy = PlannerRoutingStrategy::new(client, "balanced", "gpt-4o");
        let decision = strategy
            .decide(&request_with_health("stripe"), &providers())
            .await
            .unwrap();
        assert_eq!(decision, Provider::Adyen);
    }

    #[tokio::test]
    async fn any_failure_triggers_circuit_breaker() {
        let client = ScriptedClient::new(vec![]);
        let strategy = PlannerRoutingStrategy::new(client, "balanced", "gpt-4o");
        let decision = strategy
            .decide(&request_with_health("adyen"), &providers())
            .await
            .unwrap();
        // DeterministicLeastCost on these inputs picks Adyen (cheaper),
        // demonstrating the fallback ran rather than erroring out.
        assert_eq!(decision, Provider::Adyen);
    }

    #[tokio::test]
    async fn unregistered_plan_steps_are_dropped() {
        let client = ScriptedClient::new(vec![
            r#"{"plan": [{"agent": "Critic", "reason": "sneaky"}, {"agent": "CostAnalyst", "reason": "ok"}]}"#,
            r#"{"analysis": "cheap", "recommended_provider": "stripe", "confidence": 0.9}"#,
            r#"{"best_provider": "stripe", "reasoning": "cheapest"}"#,
            r#"{"is_valid": true}"#,
        ]);
        let strategy = PlannerRoutingStrategy::new(client, "balanced", "gpt-4o");
        let decision = strategy
            .decide(&request_with_health("nobody"), &providers())
            .await
            .unwrap();
        assert_eq!(decision, Provider::Stripe);
    }
}
