//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::retry::RetryConfig;

/// Default OpenAI-compatible router for Hugging Face inference providers.
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";

/// Default classification model (provider-qualified for the HF router).
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b:fireworks-ai";

/// Default upload cap: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Bearer token for the inference provider.
    pub api_key: SecretString,
    /// Base URL of the chat-completion API (without `/chat/completions`).
    pub base_url: String,
    /// Target model identifier.
    pub model: String,
    /// Per-request timeout for the inference call.
    pub timeout: Duration,
    /// Extra attempts after the first failed one. Zero means a single attempt.
    pub max_retries: u32,
    /// Largest upload accepted for extraction.
    pub max_upload_bytes: usize,
}

impl TriageConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("HUGGINGFACE_API_KEY")
            .or_else(|| lookup("HF_TOKEN"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("HUGGINGFACE_API_KEY".to_string()))?;

        let base_url = lookup("INBOX_TRIAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("INBOX_TRIAGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs: u64 =
            parse_var(&lookup, "INBOX_TRIAGE_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INBOX_TRIAGE_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let max_retries: u32 = parse_var(&lookup, "INBOX_TRIAGE_MAX_RETRIES")?.unwrap_or(0);

        let max_upload_bytes: usize = parse_var(&lookup, "INBOX_TRIAGE_MAX_UPLOAD_BYTES")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            max_upload_bytes,
        })
    }

    /// Retry policy derived from `max_retries`.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            ..RetryConfig::default()
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{raw}': {e}"),
            }),
    }
}
