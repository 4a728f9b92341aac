//! Page fetching configuration.

use serde::{Deserialize, Serialize};

/// Settings for fetching careers pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperSettings {
    /// User agent: "default" for the jobsift agent, "impersonate" for a
    /// browser agent, anything else is sent verbatim.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay after each request in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

fn default_user_agent() -> String {
    "impersonate".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: 0,
        }
    }
}
