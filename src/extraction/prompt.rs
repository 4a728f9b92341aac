//! Few-shot prompt construction.

use serde_json::{json, Map, Value};

use super::types::{ExampleData, Extraction};

/// Task description used for job posting extraction.
pub const DEFAULT_JOB_PROMPT: &str = r#"Extract job postings from this text. Each job posting should be a complete position being hired.

For each unique job position, extract:
- title: Job position title (like "Project Manager", "Software Developer")
- location: Work location or "None" if not specified
- description: Complete job description including ALL relevant details (requirements, responsibilities, qualifications, job details, application info)

IMPORTANT RULES:
1. If you see the same job title multiple times, combine ALL the information into ONE job posting
2. Do NOT create separate entries for the same position
3. Include all requirements, responsibilities, and job details in the description
4. Ignore company services, general skills lists, and non-hiring content
5. Only extract actual job openings/positions
6. List the title of a position before its location and description

Combine duplicate information intelligently."#;

/// Few-shot examples for job posting extraction.
pub fn default_job_examples() -> Vec<ExampleData> {
    vec![ExampleData::new(
        "Project Manager\n\
         Karachi, Pakistan\n\
         Minimum 3 years experience required.\n\
         \n\
         Project Manager\n\
         Requirements: Bachelor's degree, Agile experience\n\
         Responsibilities: Manage projects, coordinate with clients\n\
         Apply by Aug 31, 2025",
        vec![
            Extraction::new("title", "Project Manager"),
            Extraction::new("location", "Karachi, Pakistan"),
            Extraction::new(
                "description",
                "Minimum 3 years experience required. Requirements: Bachelor's degree, \
                 Agile experience. Responsibilities: Manage projects, coordinate with clients. \
                 Apply by Aug 31, 2025.",
            ),
        ],
    )]
}

/// Task description plus few-shot examples, rendered per chunk.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub description: String,
    pub examples: Vec<ExampleData>,
    /// Wrap example answers in ```json fences.
    pub fence_output: bool,
}

impl PromptTemplate {
    pub fn new(description: impl Into<String>, examples: Vec<ExampleData>) -> Self {
        Self {
            description: description.into(),
            examples,
            fence_output: true,
        }
    }

    /// Built-in job posting template.
    pub fn jobs() -> Self {
        Self::new(DEFAULT_JOB_PROMPT, default_job_examples())
    }

    pub fn with_fence_output(mut self, fence_output: bool) -> Self {
        self.fence_output = fence_output;
        self
    }

    /// Render the full prompt for one chunk of input text.
    pub fn render(&self, chunk_text: &str) -> String {
        let mut prompt = String::new();
        prompt.push_str(self.description.trim());
        prompt.push_str("\n\n");

        if !self.examples.is_empty() {
            prompt.push_str("Examples\n");
            for example in &self.examples {
                prompt.push_str("Q: ");
                prompt.push_str(example.text.trim());
                prompt.push_str("\nA: ");
                prompt.push_str(&self.format_answer(&example.extractions));
                prompt.push_str("\n\n");
            }
        }

        prompt.push_str("Q: ");
        prompt.push_str(chunk_text);
        prompt.push_str("\nA: ");
        prompt
    }

    /// Serialize extractions in the answer format the resolver reads back.
    pub fn format_answer(&self, extractions: &[Extraction]) -> String {
        let body = serde_json::to_string_pretty(&answer_value(extractions))
            .unwrap_or_else(|_| "{}".to_string());
        if self.fence_output {
            format!("```json\n{}\n```", body)
        } else {
            body
        }
    }
}

/// `{"extractions": [{"<class>": "<text>", "<class>_attributes": {..}}]}`
fn answer_value(extractions: &[Extraction]) -> Value {
    let items: Vec<Value> = extractions
        .iter()
        .map(|e| {
            let mut item = Map::new();
            item.insert(
                e.extraction_class.clone(),
                Value::String(e.extraction_text.clone()),
            );
            if !e.attributes.is_empty() {
                let attrs: Map<String, Value> = e
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                item.insert(
                    format!("{}{}", e.extraction_class, super::resolver::ATTRIBUTE_SUFFIX),
                    Value::Object(attrs),
                );
            }
            Value::Object(item)
        })
        .collect();
    json!({ "extractions": items })
}
