//! Job postings built from grounded extractions.

mod config;
mod consolidate;
mod filter;

use serde::{Deserialize, Serialize};

pub use config::JobSettings;
pub use consolidate::{consolidate, merge_descriptions};
pub use filter::{filter_jobs, is_job_title};

/// A consolidated job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub location: Option<String>,
    pub description: String,
}

impl JobPosting {
    /// Location for display, `"None"` when unknown.
    pub fn location_or_none(&self) -> &str {
        self.location.as_deref().unwrap_or("None")
    }
}
