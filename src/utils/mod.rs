//! Shared utility functions.
//!
//! - `html`: HTML escaping for the report page
//! - `text`: string comparison and truncation

mod html;
mod text;

pub use html::{css_identifier, html_escape};
pub use text::{dedup_key, similarity, truncate_chars};
