//! Job consolidation and filtering configuration.

use serde::{Deserialize, Serialize};

/// Settings for turning extractions into job postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSettings {
    /// Extractions containing any of these (case-insensitive) are dropped
    #[serde(default = "default_skip_terms")]
    pub skip_terms: Vec<String>,
    /// A posting is kept only if its title contains one of these
    #[serde(default = "default_title_keywords")]
    pub title_keywords: Vec<String>,
    /// Descriptions must be longer than this many characters
    #[serde(default = "default_min_description_chars")]
    pub min_description_chars: usize,
    /// Description sentences must be longer than this many characters
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
    /// Titles at least this similar (0.0 - 1.0) are treated as the same position
    #[serde(default = "default_title_similarity")]
    pub title_similarity: f64,
}

fn default_skip_terms() -> Vec<String> {
    [
        "business continuity",
        "managed hosting",
        "content marketing",
        "brand identity",
        "web design",
        "canva",
        "figma",
        "blender",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_title_keywords() -> Vec<String> {
    [
        "manager",
        "developer",
        "engineer",
        "analyst",
        "designer",
        "coordinator",
        "specialist",
        "lead",
        "senior",
        "junior",
        "intern",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_min_description_chars() -> usize {
    50
}

fn default_min_sentence_chars() -> usize {
    10
}

fn default_title_similarity() -> f64 {
    0.9
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            skip_terms: default_skip_terms(),
            title_keywords: default_title_keywords(),
            min_description_chars: default_min_description_chars(),
            min_sentence_chars: default_min_sentence_chars(),
            title_similarity: default_title_similarity(),
        }
    }
}
