//! Email classification pipeline.
//!
//! Every submission flows through:
//! 1. `extractor::extract()`: uploaded bytes to text (skipped for typed text)
//! 2. `prompt::build_prompt()`: fixed instruction with the email embedded
//! 3. `LlmProvider::complete()`: one remote chat completion
//! 4. `parser::parse_classification()`: strict JSON to `ClassificationResult`
//!
//! `EmailProcessor` sequences the steps and substitutes the fallback result
//! when step 3 or 4 fails.

pub mod extractor;
pub mod parser;
pub mod processor;
pub mod prompt;
pub mod types;
pub mod upload;

pub use processor::{EmailProcessor, ProcessorConfig};
pub use types::{
    Classification, ClassificationResult, EmailSubmission, ExtractedText, FileKind, SourceKind,
};
pub use upload::Upload;
