//! Few-shot structured extraction with source grounding.
//!
//! A document is chunked, each chunk is sent to a [`LanguageModel`] with a
//! prompt built from a task description and worked examples, and the
//! returned values are aligned back to character offsets in the document.

mod alignment;
mod annotator;
mod chunking;
mod config;
mod io;
mod prompt;
mod resolver;
mod types;

use std::sync::Arc;

use thiserror::Error;

use crate::llm::{LanguageModel, LlmError};

pub use alignment::Aligner;
pub use annotator::Annotator;
pub use chunking::{chunk_text, TextChunk};
pub use config::ExtractionSettings;
pub use io::{load_annotated_documents, save_annotated_documents};
pub use prompt::{default_job_examples, PromptTemplate, DEFAULT_JOB_PROMPT};
pub use resolver::{parse_output, strip_fence, ATTRIBUTE_SUFFIX};
pub use types::{AlignmentStatus, AnnotatedDocument, CharInterval, ExampleData, Extraction};

/// Errors that can occur during extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Could not parse model output: {0}")]
    Resolve(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Extract from a single text with default settings.
pub async fn extract(
    text: &str,
    prompt_description: &str,
    examples: Vec<ExampleData>,
    model: Arc<dyn LanguageModel>,
) -> Result<AnnotatedDocument, ExtractionError> {
    if prompt_description.trim().is_empty() {
        return Err(ExtractionError::InvalidInput(
            "prompt description is empty".to_string(),
        ));
    }
    let template = PromptTemplate::new(prompt_description, examples);
    Annotator::new(model, template, ExtractionSettings::default())
        .annotate("document", text)
        .await
}
