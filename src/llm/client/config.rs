//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether LLM extraction is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (openai or ollama)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries on 429/503 before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff when no Retry-After is sent
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    OPENAI_ENDPOINT.to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_base_ms() -> u64 {
    1000
}

const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
const TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
const OLLAMA_ENDPOINT: &str = "http://localhost:11434";

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default()
    }
}

impl LlmConfig {
    /// Defaults without consulting the environment.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
        }
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Supported variables:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "openai" (default), "groq", "together" or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    ///
    /// LLM_PROVIDER wins over auto-detection from API keys. Without an
    /// explicit provider, `OPENAI_API_KEY` is preferred over `GROQ_API_KEY`.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = lookup("LLM_PROVIDER");
        if let Some(ref val) = explicit_provider {
            if let Some(provider) = LlmProvider::from_str(val) {
                self.provider = provider;
            }
        }

        let explicit_endpoint = lookup("LLM_ENDPOINT");
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        }

        if let Some(val) = lookup("LLM_API_KEY") {
            self.api_key = Some(val);
        }

        if let Some(ref provider_str) = explicit_provider {
            let provider_lower = provider_str.to_lowercase();

            if explicit_endpoint.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.endpoint = GROQ_ENDPOINT.to_string(),
                    "openai" => self.endpoint = OPENAI_ENDPOINT.to_string(),
                    "together" => self.endpoint = TOGETHER_ENDPOINT.to_string(),
                    "ollama" => self.endpoint = OLLAMA_ENDPOINT.to_string(),
                    _ => {}
                }
            }

            if self.api_key.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.api_key = lookup("GROQ_API_KEY"),
                    "openai" => self.api_key = lookup("OPENAI_API_KEY"),
                    _ => {}
                }
            }
        } else if self.api_key.is_none() {
            if let Some(key) = lookup("OPENAI_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
            } else if let Some(key) = lookup("GROQ_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
                if explicit_endpoint.is_none() && self.endpoint == OPENAI_ENDPOINT {
                    self.endpoint = GROQ_ENDPOINT.to_string();
                }
            }
        }

        if let Some(val) = lookup("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Endpoint with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::base_default();
        assert!(config.enabled);
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.endpoint, "https://api.openai.com");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_openai_key_autodetect() {
        let config = LlmConfig::base_default().apply_env(env(&[("OPENAI_API_KEY", "sk-1")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-1"));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.openai.com");
    }

    #[test]
    fn test_groq_key_autodetect_switches_endpoint() {
        let config = LlmConfig::base_default().apply_env(env(&[("GROQ_API_KEY", "gsk_1")]));
        assert_eq!(config.api_key.as_deref(), Some("gsk_1"));
        assert_eq!(config.endpoint, "https://api.groq.com/openai");
    }

    #[test]
    fn test_explicit_provider_wins() {
        let config = LlmConfig::base_default().apply_env(env(&[
            ("LLM_PROVIDER", "openai"),
            ("GROQ_API_KEY", "gsk_1"),
            ("OPENAI_API_KEY", "sk-2"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-2"));
        assert_eq!(config.endpoint, "https://api.openai.com");
    }

    #[test]
    fn test_ollama_provider() {
        let config = LlmConfig::base_default().apply_env(env(&[
            ("LLM_PROVIDER", "ollama"),
            ("LLM_MODEL", "llama3.1:8b"),
        ]));
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.1:8b");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_numeric_overrides_ignore_garbage() {
        let config = LlmConfig::base_default().apply_env(env(&[
            ("LLM_MAX_TOKENS", "lots"),
            ("LLM_TEMPERATURE", "0.7"),
            ("LLM_ENABLED", "false"),
        ]));
        assert_eq!(config.max_tokens, 4096);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!config.enabled);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = LlmConfig::base_default().with_api_key("secret");
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("secret"));
    }
}
