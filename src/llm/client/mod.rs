//! LLM client for few-shot extraction.
//!
//! Supports OpenAI-compatible chat completions and the Ollama generate API.

mod config;
mod retry;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use config::{LlmConfig, LlmProvider};
pub use retry::{backoff_delay, parse_retry_after};

use super::LanguageModel;

/// System message sent with chat completion requests.
const SYSTEM_MESSAGE: &str =
    "You extract structured data from text and answer with fenced JSON only.";

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// API returned an error
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Still rate limited after all retries
    #[error("Rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },
    /// Provider needs an API key but none is configured
    #[error("No API key configured for {0} (set LLM_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey(String),
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

/// LLM client for extraction prompts.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Chat completion request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Check if the LLM service is reachable with the current credentials.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.list_models().await.is_ok()
    }

    /// List models offered by the provider.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        match self.config.provider {
            LlmProvider::Ollama => {
                #[derive(Deserialize)]
                struct TagsResponse {
                    models: Vec<ModelInfo>,
                }

                #[derive(Deserialize)]
                struct ModelInfo {
                    name: String,
                }

                let url = format!("{}/api/tags", self.config.base_url());
                let resp = self.send_with_retry(|| self.client.get(&url)).await?;
                let tags: TagsResponse = resp
                    .json()
                    .await
                    .map_err(|e| LlmError::Parse(e.to_string()))?;
                Ok(tags.models.into_iter().map(|m| m.name).collect())
            }
            LlmProvider::OpenAI => {
                #[derive(Deserialize)]
                struct ModelsResponse {
                    data: Vec<ModelEntry>,
                }

                #[derive(Deserialize)]
                struct ModelEntry {
                    id: String,
                }

                let api_key = self.require_api_key()?;
                let url = format!("{}/v1/models", self.config.base_url());
                let resp = self
                    .send_with_retry(|| self.client.get(&url).bearer_auth(api_key))
                    .await?;
                let models: ModelsResponse = resp
                    .json()
                    .await
                    .map_err(|e| LlmError::Parse(e.to_string()))?;
                Ok(models.data.into_iter().map(|m| m.id).collect())
            }
        }
    }

    /// Send a prompt and return the raw completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        debug!(
            "Sending {} char prompt to {} ({})",
            prompt.len(),
            self.config.model,
            self.config.provider.as_str()
        );

        let text = match self.config.provider {
            LlmProvider::OpenAI => self.call_chat(prompt).await?,
            LlmProvider::Ollama => self.call_ollama(prompt).await?,
        };

        if text.trim().is_empty() {
            return Err(LlmError::Parse("Empty completion".to_string()));
        }
        Ok(text)
    }

    fn require_api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.config.base_url().to_string()))
    }

    /// Call an OpenAI-compatible chat completions endpoint.
    async fn call_chat(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.require_api_key()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let resp = self
            .send_with_retry(|| self.client.post(&url).bearer_auth(api_key).json(&request))
            .await?;

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(error) = chat.error {
            return Err(LlmError::Parse(error.message));
        }

        chat.choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("Response contained no choices".to_string()))
    }

    /// Call Ollama API with a prompt.
    async fn call_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.base_url());
        let resp = self
            .send_with_retry(|| self.client.post(&url).json(&request))
            .await?;

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }

    /// Send a request, retrying on 429/503 with Retry-After or exponential backoff.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, LlmError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let resp = build()
                .send()
                .await
                .map_err(|e| LlmError::Connection(e.to_string()))?;

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
            {
                let retry_after = resp
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.to_string());

                if attempt >= self.config.max_retries {
                    return Err(LlmError::RateLimited {
                        retry_after_secs: retry_after.and_then(|s| s.trim().parse().ok()),
                    });
                }

                let wait = parse_retry_after(retry_after.as_deref())
                    .unwrap_or_else(|| backoff_delay(attempt, self.config.retry_base_ms));
                warn!(
                    "LLM rate limited (HTTP {}, attempt {}), waiting {:?}",
                    status.as_u16(),
                    attempt + 1,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            return Ok(resp);
        }
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn infer(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete(prompt).await
    }
}
