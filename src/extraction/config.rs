//! Extraction pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::scrapers::{DEFAULT_SECTION_PATTERNS, DEFAULT_SECTION_SEPARATOR};

/// Settings for chunking, prompting and grounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Maximum characters of text sent to the model per request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Chunks processed concurrently
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Extraction passes over the document; later passes only add new spans
    #[serde(default = "default_passes")]
    pub passes: usize,
    /// Minimum matched-token ratio for fuzzy grounding (0.0 - 1.0)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    /// Expect the model to wrap its JSON answer in a code fence
    #[serde(default = "default_fence_output")]
    pub fence_output: bool,
    /// Regexes whose match on a line starts a new job section
    #[serde(default = "default_section_patterns")]
    pub section_patterns: Vec<String>,
    /// Separator used when joining sections for extraction
    #[serde(default = "default_section_separator")]
    pub section_separator: String,
    /// Custom task description replacing the built-in job prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

fn default_max_chunk_chars() -> usize {
    12000
}

fn default_max_workers() -> usize {
    4
}

fn default_passes() -> usize {
    1
}

fn default_fuzzy_threshold() -> f64 {
    0.75
}

fn default_fence_output() -> bool {
    true
}

fn default_section_patterns() -> Vec<String> {
    DEFAULT_SECTION_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_section_separator() -> String {
    DEFAULT_SECTION_SEPARATOR.to_string()
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            max_workers: default_max_workers(),
            passes: default_passes(),
            fuzzy_threshold: default_fuzzy_threshold(),
            fence_output: default_fence_output(),
            section_patterns: default_section_patterns(),
            section_separator: default_section_separator(),
            prompt: None,
        }
    }
}
