//! Shared helper functions for CLI commands.

use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::extraction::{default_job_examples, PromptTemplate};
use crate::scrapers::{fetch_page, read_page, HttpClient, PageContent, SectionSplitter};

/// Whether a source argument names a URL rather than a file.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch a URL or read a local file into page content.
pub async fn load_source(settings: &Settings, source: &str) -> anyhow::Result<PageContent> {
    if is_url(source) {
        let client = HttpClient::from_settings(&settings.scraper)?;
        let pb = spinner(format!("Fetching {}...", source));
        let page = fetch_page(&client, source).await;
        pb.finish_and_clear();
        Ok(page?)
    } else {
        let path = Path::new(source);
        read_page(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Section splitter from the configured patterns.
pub fn section_splitter(settings: &Settings) -> anyhow::Result<SectionSplitter> {
    SectionSplitter::new(&settings.extraction.section_patterns)
        .context("Invalid section pattern in config")
}

/// Prompt template, honouring a custom task description from config.
pub fn prompt_template(settings: &Settings) -> PromptTemplate {
    match &settings.extraction.prompt {
        Some(description) if !description.trim().is_empty() => {
            PromptTemplate::new(description.as_str(), default_job_examples())
        }
        _ => PromptTemplate::jobs(),
    }
}

/// Spinner on stderr with a message.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
