//! HTTP client for fetching careers pages.

mod response;
mod user_agent;

pub use response::{is_html_content_type, HttpResponse};
pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::config::ScraperSettings;

/// Errors raised while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },
}

/// Parse and check that a URL is fetchable (http or https).
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// HTTP client with user agent selection and a politeness delay.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_delay: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default user agent.
    pub fn new(timeout: Duration, request_delay: Duration) -> Result<Self, FetchError> {
        Self::with_user_agent(timeout, request_delay, None)
    }

    /// Create a new HTTP client with custom user agent configuration.
    /// - None or Some("default"): Use default jobsift user agent
    /// - Some("impersonate"): Use random real browser user agent
    /// - Some(custom): Use custom user agent string
    pub fn with_user_agent(
        timeout: Duration,
        request_delay: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self, FetchError> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            request_delay,
        })
    }

    /// Build a client from scraper settings.
    pub fn from_settings(settings: &ScraperSettings) -> Result<Self, FetchError> {
        Self::with_user_agent(
            Duration::from_secs(settings.timeout_secs),
            Duration::from_millis(settings.request_delay_ms),
            Some(settings.user_agent.as_str()),
        )
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = validate_url(url)?;

        let start = Instant::now();
        let response = self.client.get(parsed).send().await?;
        let duration = start.elapsed();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        debug!(
            "GET {} -> {} in {}ms",
            url,
            response.status().as_u16(),
            duration.as_millis()
        );

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        Ok(HttpResponse {
            status: response.status(),
            final_url: response.url().to_string(),
            headers,
            response,
        })
    }

    /// Fetch a page body, failing on non-success status codes.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
