//! LLM integration for few-shot extraction.
//!
//! The [`LanguageModel`] trait is the seam the extraction pipeline talks to;
//! [`LlmClient`] implements it over HTTP.

mod client;

use async_trait::async_trait;

pub use client::{backoff_delay, parse_retry_after, LlmClient, LlmConfig, LlmError, LlmProvider};

/// A model that turns a prompt into a completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the underlying model (e.g. "gpt-4o").
    fn model_id(&self) -> &str;

    /// Run inference on a single prompt.
    async fn infer(&self, prompt: &str) -> Result<String, LlmError>;
}
