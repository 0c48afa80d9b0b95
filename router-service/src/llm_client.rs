//! A `reqwest`-backed `LlmClient`, grounded on the original's use of
//! `aisuite.Client().chat.completions.create(...)`, an OpenAI-compatible
//! chat completions endpoint addressed generically so any provider behind
//! the same wire shape works.

use async_trait::async_trait;
use router_core::{RouterError, RouterResult};
use serde_json::json;

use router_strategy::{ChatMessage, ChatRole, LlmClient};

pub struct ReqwestLlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReqwestLlmClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        ReqwestLlmClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmClient for ReqwestLlmClient {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> RouterResult<String> {
        let payload = json!({
            "model": model,
            "response_format": {"type": "json_object"},
            "messages": messages.iter().map(|m| json!({
                "role": match m.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                },
                "content": m.content,
            })).collect::<Vec<_>>(),
        });

        let mut request = self.http.post(&self.base_url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RouterError::StrategyFailure(format!("LLM request failed: {e}")))?
            .error_for_status()
            .map_err(|e| RouterError::StrategyFailure(format!("LLM returned an error status: {e}")))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RouterError::StrategyFailure(format!("LLM response was not JSON: {e}")))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| RouterError::StrategyFailure("LLM response missing choices[0].message.content".to_string()))
    }
}
