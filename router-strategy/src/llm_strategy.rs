//! The single-shot LLM strategy, grounded on the original's
//! `LLMDecisionStrategy`.

use async_trait::async_trait;
use router_core::{ChargeRequest, Provider, ResolvedProvider, RouterResult};
use tracing::warn;

use crate::llm::{parse_json_object, ChatMessage, LlmClient};
use crate::strategy::{DecisionStrategy, DeterministicLeastCostStrategy};

pub struct LlmDecisionStrategy<C> {
    client: C,
    objective: String,
    model: String,
}

impl<C> LlmDecisionStrategy<C>
where
    C: LlmClient,
{
    pub fn new(client: C, objective: impl Into<String>, model: impl Into<String>) -> Self {
        LlmDecisionStrategy {
            client,
            objective: objective.into(),
            model: model.into(),
        }
    }

    async fn try_decide(
        &self,
        request: &ChargeRequest,
        providers: &[ResolvedProvider],
    ) -> RouterResult<Provider> {
        let provider_json = serde_json::to_string(providers)
            .map_err(|e| router_core::RouterError::StrategyFailure(e.to_string()))?;
        let request_json = serde_json::to_string(request)
            .map_err(|e| router_core::RouterError::StrategyFailure(e.to_string()))?;

        let prompt = format!(
            "You are an intelligent payment routing engine.\nObjective: {}\n\n\
             --- RESOLVED PROVIDER DATA ---\nPROVIDERS: {}\nTRANSACTION: {}\n\n\
             --- INSTRUCTION ---\nSelect the best provider according to the objective.\n\
             Return ONLY a JSON object: {{\"best_provider\": \"...\", \"reasoning\": \"...\"}}",
            self.objective, provider_json, request_json
        );

        let messages = [
            ChatMessage::system("You are a precise routing engine."),
            ChatMessage::user(prompt),
        ];

        let response = self.client.chat(&self.model, &messages).await?;
        let parsed = parse_json_object(&response)?;
        let best_provider = parsed
            .get("best_provider")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                router_core::RouterError::StrategyFailure(
                    "LLM response missing best_provider".to_string(),
                )
            })?;

        Provider::parse_validated(best_provider).ok_or_else(|| {
            router_core::RouterError::StrategyFailure(format!(
                "LLM returned unknown provider name {best_provider:?}"
            ))
        })
    }
}

#[async_trait]
impl<C> DecisionStrategy for LlmDecisionStrategy<C>
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
                warn!(error = %e, "LLM strategy failed, falling back to DeterministicLeastCost");
                DeterministicLeastCostStrategy.decide(request, providers).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "LLM"
    }
}
