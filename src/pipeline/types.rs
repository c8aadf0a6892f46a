//! Shared types for the classification pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// Reply substituted when the remote classification step fails.
pub const FALLBACK_RESPONSE: &str =
    "Desculpe, não foi possível gerar uma resposta automática neste momento.";

// ── Sources ─────────────────────────────────────────────────────────

/// Declared type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Txt,
}

impl FileKind {
    /// Short label for logging and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a submission's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pdf,
    Txt,
    Direct,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Direct => "direct",
        }
    }
}

impl From<FileKind> for SourceKind {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::Pdf => Self::Pdf,
            FileKind::Txt => Self::Txt,
        }
    }
}

// ── Extracted text ──────────────────────────────────────────────────

/// Text pulled out of an upload. Never empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Wrap extracted text, rejecting whitespace-only content.
    pub fn new(text: String, kind: FileKind) -> Result<Self, InputError> {
        if text.trim().is_empty() {
            return Err(InputError::EmptyContent {
                kind: kind.label().to_string(),
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// ── Submission ──────────────────────────────────────────────────────

/// One email to classify. Request-scoped and immutable.
#[derive(Debug, Clone)]
pub struct EmailSubmission {
    /// Correlation id for logs.
    pub id: Uuid,
    /// Subject line, if one was supplied and non-empty.
    pub subject: Option<String>,
    /// Email body. Never empty after trimming.
    pub body: String,
    pub source: SourceKind,
}

impl EmailSubmission {
    /// Submission from directly typed subject and body.
    ///
    /// An empty or whitespace-only body is rejected; an empty subject is
    /// treated as absent.
    pub fn direct(subject: Option<&str>, body: &str) -> Result<Self, InputError> {
        if body.trim().is_empty() {
            return Err(InputError::MissingContent);
        }
        let subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self {
            id: Uuid::new_v4(),
            subject,
            body: body.to_string(),
            source: SourceKind::Direct,
        })
    }

    /// Submission from text extracted out of an uploaded file.
    pub fn from_extracted(text: ExtractedText, kind: FileKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: None,
            body: text.into_string(),
            source: kind.into(),
        }
    }

    /// Email text as embedded in the prompt: a labeled subject line (when
    /// present) followed by the body.
    pub fn prompt_text(&self) -> String {
        match &self.subject {
            Some(subject) => format!("Assunto: {subject}\n\n{}", self.body),
            None => self.body.clone(),
        }
    }
}

// ── Classification ──────────────────────────────────────────────────

/// Whether an email needs an actionable reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "produtivo")]
    Productive,
    #[serde(rename = "improdutivo")]
    Unproductive,
}

impl Classification {
    /// Map a model label to a classification, case-insensitively.
    ///
    /// Accepts the Portuguese labels the prompt asks for and their English
    /// equivalents.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "produtivo" | "productive" => Some(Self::Productive),
            "improdutivo" | "unproductive" => Some(Self::Unproductive),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Productive => "produtivo",
            Self::Unproductive => "improdutivo",
        }
    }
}

/// The single artifact produced for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub suggested_response: String,
    /// Set only on the fallback path, describing what failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationResult {
    pub fn new(classification: Classification, suggested_response: impl Into<String>) -> Self {
        Self {
            classification,
            suggested_response: suggested_response.into(),
            error: None,
        }
    }

    /// Fixed safe result used when classification fails.
    pub fn fallback(error: impl Into<String>) -> Self {
        Self {
            classification: Classification::Unproductive,
            suggested_response: FALLBACK_RESPONSE.to_string(),
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
