//! Email processor - extraction, classification and fallback.
//!
//! Flow per submission:
//! 1. Text extraction (uploads only); failures are input errors, returned as-is
//! 2. Prompt construction
//! 3. One inference call through the injected `LlmProvider`
//! 4. Strict parsing of the model output
//!
//! Any failure in steps 3-4 is absorbed into the fallback result. The
//! processor holds no per-request state and is safe to share across tasks.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, TriageConfig};
use crate::error::{ClassifyError, InputError};
use crate::llm::provider::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};
use crate::pipeline::extractor;
use crate::pipeline::parser::parse_classification;
use crate::pipeline::prompt::build_prompt;
use crate::pipeline::types::{ClassificationResult, EmailSubmission, FileKind};
use crate::pipeline::upload::Upload;

/// Low temperature keeps labels stable between runs.
const CLASSIFY_TEMPERATURE: f32 = 0.2;

/// Output cap for one classification. The reply is a short JSON object, but
/// reasoning models spend part of the budget before answering.
const CLASSIFY_MAX_TOKENS: u32 = 2048;

/// Processor settings.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Largest upload accepted for extraction.
    pub max_upload_bytes: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&TriageConfig> for ProcessorConfig {
    fn from(config: &TriageConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Classifies emails and drafts suggested replies.
pub struct EmailProcessor {
    llm: Arc<dyn LlmProvider>,
    config: ProcessorConfig,
}

impl EmailProcessor {
    /// Create a new processor around an already-constructed provider.
    pub fn new(llm: Arc<dyn LlmProvider>, config: ProcessorConfig) -> Self {
        Self { llm, config }
    }

    /// Process an uploaded PDF or TXT file.
    pub async fn process_upload(
        &self,
        bytes: &[u8],
        kind: FileKind,
    ) -> Result<ClassificationResult, InputError> {
        if bytes.len() > self.config.max_upload_bytes {
            return Err(InputError::TooLarge {
                size: bytes.len(),
                max: self.config.max_upload_bytes,
            });
        }

        let text = extractor::extract(bytes, kind)
            .inspect_err(|e| info!(kind = kind.label(), error = %e, "Rejected upload"))?;
        let submission = EmailSubmission::from_extracted(text, kind);
        Ok(self.process(&submission).await)
    }

    /// Convenience wrapper for an `Upload` read from disk.
    pub async fn process_file(&self, upload: &Upload) -> Result<ClassificationResult, InputError> {
        self.process_upload(&upload.bytes, upload.kind).await
    }

    /// Process directly supplied subject and body text.
    pub async fn process_direct_text(
        &self,
        subject: Option<&str>,
        body: &str,
    ) -> Result<ClassificationResult, InputError> {
        let submission = EmailSubmission::direct(subject, body)?;
        Ok(self.process(&submission).await)
    }

    /// Classify a validated submission. Never fails: remote or parse errors
    /// produce the fallback result.
    pub async fn process(&self, submission: &EmailSubmission) -> ClassificationResult {
        let span = info_span!(
            "submission",
            id = %submission.id,
            source = submission.source.label()
        );

        async {
            match self.classify(submission).await {
                Ok(result) => {
                    info!(
                        classification = result.classification.label(),
                        "Email classified"
                    );
                    result
                }
                Err(e) => {
                    warn!(error = %e, "Classification failed, returning fallback result");
                    ClassificationResult::fallback(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn classify(
        &self,
        submission: &EmailSubmission,
    ) -> Result<ClassificationResult, ClassifyError> {
        let prompt = build_prompt(&submission.prompt_text());
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_max_tokens(CLASSIFY_MAX_TOKENS);

        debug!(model = self.llm.model_name(), "Requesting classification");
        let response = self.llm.complete(request).await?;
        if response.finish_reason == FinishReason::Length {
            warn!(
                output_tokens = response.output_tokens,
                "Model output hit the token limit"
            );
        }

        parse_classification(&response.content).map_err(|e| {
            warn!(
                raw_response = %response.content,
                error = %e,
                "Failed to parse classification response"
            );
            ClassifyError::from(e)
        })
    }
}
