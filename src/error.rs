//! Error types for Inbox Triage.

use std::time::Duration;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Whether this error was caused by the caller's input (4xx-class)
    /// rather than by the service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Input validation errors. These always indicate bad input, never a
/// transient service problem, and are surfaced to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Email content is required")]
    MissingContent,

    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("No text could be extracted from the {kind} file")]
    EmptyContent { kind: String },

    #[error("Could not parse PDF document: {0}")]
    MalformedDocument(String),

    #[error("Upload too large: {size} bytes (limit {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {0} (expected .pdf or .txt)")]
    UnsupportedFileType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inference provider errors (transport class).
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed {
        provider: String,
        reason: String,
        status: Option<u16>,
    },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl LlmError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Network failures, timeouts, rate limits and 5xx responses are
    /// retryable. Auth failures, other 4xx responses and malformed
    /// envelopes are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed { status, .. } => match status {
                Some(code) => *code >= 500,
                None => true,
            },
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::AuthFailed { .. } | Self::InvalidResponse { .. } => false,
        }
    }
}

/// Model output that could not be turned into a classification.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Model output is not a valid JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unknown classification label: '{0}'")]
    UnknownClassification(String),
}

/// Failure of the remote classification step. Always absorbed into the
/// fallback result by the processor.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("{0}")]
    Transport(#[from] LlmError),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
