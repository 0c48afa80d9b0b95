//! The LLM contract consumed by the single-shot and planner strategies,
//! grounded on the original's use of
//! `aisuite.Client().chat.completions.create(...)`. A narrow seam so
//! neither strategy depends on a concrete HTTP client.

use async_trait::async_trait;
use router_core::{RouterError, RouterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A provider-agnostic chat completion client. Implementations forcing
/// `response_format=json_object` must guarantee the returned string
/// parses as JSON; everything downstream assumes it does and treats a
/// parse failure as a [`RouterError::StrategyFailure`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> RouterResult<String>;
}

/// Parses a strict JSON object response, mapping any failure to
/// [`RouterError::StrategyFailure`] so callers can route it straight into
/// the circuit breaker.
pub fn parse_json_object(response: &str) -> RouterResult<serde_json::Value> {
    serde_json::from_str(response)
        .map_err(|e| RouterError::StrategyFailure(format!("malformed LLM response: {e}")))
}
