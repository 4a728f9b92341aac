//! Configuration management for jobsift.
//!
//! Settings come from a TOML file (explicit path, or one discovered with
//! `prefer`, falling back to `./jobsift.toml` and
//! `<config dir>/jobsift/config.toml`), then LLM settings are overridden
//! from the environment. Missing files mean defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::extraction::ExtractionSettings;
use crate::jobs::JobSettings;
use crate::llm::LlmConfig;
use crate::scrapers::ScraperSettings;

/// Config file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "jobsift.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// All application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scraper: ScraperSettings,
    #[serde(default = "LlmConfig::base_default")]
    pub llm: LlmConfig,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub jobs: JobSettings,
}

impl Settings {
    /// Parse settings from TOML text. Missing sections use defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Render the settings as TOML. The API key is never written.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Find the config file to use when none is given explicitly.
///
/// `prefer` discovers `jobsift.*` in its standard locations, the working
/// directory first. Only TOML is read, so any other discovery falls back to
/// the fixed candidates from [`config_candidates`].
pub async fn find_config_file() -> Option<PathBuf> {
    match prefer::load("jobsift").await {
        Ok(found) => {
            if let Some(path) = found.source_path() {
                let path: &Path = path.as_ref();
                if is_toml(path) {
                    return Some(path.to_path_buf());
                }
                debug!("Ignoring non-TOML config {}", path.display());
            }
        }
        Err(_) => debug!("prefer discovered no jobsift config"),
    }
    first_existing(&config_candidates())
}

/// `./jobsift.toml`, then `<config dir>/jobsift/config.toml`.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILENAME)];
    candidates.extend(default_config_path());
    candidates
}

/// `<config dir>/jobsift/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jobsift").join("config.toml"))
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Load settings from `path` or the discovered config file, with
/// environment overrides applied to the LLM section.
pub async fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file().await,
    };
    load_settings_with_env(path.as_deref(), |key| std::env::var(key).ok())
}

/// Load settings from `path` (defaults when `None`), reading environment
/// variables through `lookup`. A given path must exist.
pub fn load_settings_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(p) = path.filter(|p| !p.is_file()) {
        return Err(ConfigError::NotFound(p.to_path_buf()));
    }

    let mut settings = match path {
        Some(path) => load_file(path)?,
        None => {
            debug!("No config file found, using defaults");
            Settings::default()
        }
    };

    settings.llm = settings.llm.apply_env(lookup);
    Ok(settings)
}

fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    debug!("Loading config from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Settings::from_toml(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
