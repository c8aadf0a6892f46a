//! LLM integration for Inbox Triage.
//!
//! One backend: any OpenAI-compatible chat completion endpoint (the Hugging
//! Face router by default), reached through `ChatCompletionsProvider`.
//! The processor only sees the `LlmProvider` trait, so tests swap in mocks.

pub mod chat_completions;
pub mod provider;
pub mod retry;

pub use chat_completions::ChatCompletionsProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::config::TriageConfig;
use crate::error::LlmError;
use crate::llm::retry::RetryConfig;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl From<&TriageConfig> for LlmConfig {
    fn from(config: &TriageConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
            retry: config.retry(),
        }
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = ChatCompletionsProvider::new(
        &config.base_url,
        config.api_key.clone(),
        config.model.clone(),
        config.timeout,
        config.retry.clone(),
    )?;
    tracing::info!(
        "Using chat completions at {} (model: {})",
        config.base_url,
        config.model
    );
    Ok(Arc::new(provider))
}
