//! Page acquisition: fetching, visible text extraction and section splitting.

mod config;
mod http_client;
pub mod page;
pub mod sections;

use std::path::Path;

use tracing::info;

pub use config::ScraperSettings;
pub use http_client::{
    is_html_content_type, resolve_user_agent, validate_url, FetchError, HttpClient, HttpResponse,
    IMPERSONATE_USER_AGENTS, USER_AGENT,
};
pub use page::{page_title, visible_text};
pub use sections::{
    combine_sections, SectionSplitter, DEFAULT_SECTION_PATTERNS, DEFAULT_SECTION_SEPARATOR,
};

/// Raw content of a page, either fetched or read from disk.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// URL or file path the content came from.
    pub source: String,
    /// Page title, when the content is HTML and has one.
    pub title: Option<String>,
    /// Visible text of the page.
    pub text: String,
}

impl PageContent {
    /// Build page content from a body, parsing HTML when `is_html` is set.
    pub fn from_body(source: &str, body: &str, is_html: bool) -> Self {
        if is_html {
            Self {
                source: source.to_string(),
                title: page_title(body),
                text: visible_text(body),
            }
        } else {
            Self {
                source: source.to_string(),
                title: None,
                text: body.to_string(),
            }
        }
    }
}

/// Fetch a page over HTTP and extract its visible text.
pub async fn fetch_page(client: &HttpClient, url: &str) -> Result<PageContent, FetchError> {
    let response = client.get(url).await?;
    if !response.is_success() {
        return Err(FetchError::Status {
            status: response.status.as_u16(),
            url: url.to_string(),
        });
    }
    if response.final_url != url {
        info!("{} redirected to {}", url, response.final_url);
    }
    let is_html = response.is_html();
    let body = response.text().await?;
    info!("Fetched {} ({} bytes)", url, body.len());
    Ok(PageContent::from_body(url, &body, is_html))
}

/// Read a page from disk. Files ending in `.txt` are taken as plain text.
pub fn read_page(path: &Path) -> std::io::Result<PageContent> {
    let body = std::fs::read_to_string(path)?;
    let is_text = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);
    Ok(PageContent::from_body(
        &path.display().to_string(),
        &body,
        !is_text,
    ))
}
