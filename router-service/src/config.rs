//! Env-driven configuration, grounded on the original's
//! `core/config.py` and parsed once at the composition root.

use std::env;
use std::time::Duration;

use router_core::Provider;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategySelector {
    LeastCost,
    Llm,
    Planner,
    Fixed,
}

impl StrategySelector {
    fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "LEAST_COST" => Some(StrategySelector::LeastCost),
            "LLM" => Some(StrategySelector::Llm),
            "PLANNER" => Some(StrategySelector::Planner),
            "FIXED" => Some(StrategySelector::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub routing_strategy: StrategySelector,
    pub routing_model: String,
    pub routing_objective: String,
    pub renewal_tick: Duration,
    pub renewal_lookahead: chrono::Duration,
    /// Only consulted when `routing_strategy == Fixed`.
    pub fixed_provider: Provider,
    pub llm_api_base_url: String,
    pub llm_api_key: Option<String>,
}

impl RouterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let routing_strategy = env_or("ROUTING_STRATEGY", "LEAST_COST");
        let routing_strategy = StrategySelector::parse(&routing_strategy).ok_or(ConfigError::InvalidValue {
            key: "ROUTING_STRATEGY",
            value: routing_strategy,
        })?;

        let fixed_provider_raw = env_or("FIXED_PROVIDER", "stripe");
        let fixed_provider = Provider::parse_validated(&fixed_provider_raw).ok_or(ConfigError::InvalidValue {
            key: "FIXED_PROVIDER",
            value: fixed_provider_raw,
        })?;

        let renewal_tick_seconds: u64 = env_or("RENEWAL_TICK_SECONDS", "60")
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "RENEWAL_TICK_SECONDS",
                value: env_or("RENEWAL_TICK_SECONDS", "60"),
            })?;

        let renewal_lookahead_days: i64 = env_or("RENEWAL_LOOKAHEAD_DAYS", "7")
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "RENEWAL_LOOKAHEAD_DAYS",
                value: env_or("RENEWAL_LOOKAHEAD_DAYS", "7"),
            })?;

        Ok(RouterConfig {
            routing_strategy,
            routing_model: env_or("ROUTING_MODEL", "gpt-4o"),
            routing_objective: env_or("ROUTING_OBJECTIVE", "least_cost"),
            renewal_tick: Duration::from_secs(renewal_tick_seconds),
            renewal_lookahead: chrono::Duration::days(renewal_lookahead_days),
            fixed_provider,
            llm_api_base_url: env_or("LLM_API_BASE_URL", "https://api.openai.com/v1/chat/completions"),
            llm_api_key: env::var("LLM_API_KEY").ok(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
