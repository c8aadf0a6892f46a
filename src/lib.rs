//! Inbox Triage: classify emails as productive or unproductive and draft
//! a suggested reply with a remote LLM.

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
