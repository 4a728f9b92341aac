//! Rendering extraction results for people and programs.

mod html;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::Extraction;
use crate::jobs::JobPosting;

pub use html::render_html;

/// Width of the rules in the text report.
const RULE_WIDTH: usize = 80;

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    /// URL or file the text came from
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    pub section_count: usize,
    pub generated_at: DateTime<Utc>,
    pub jobs: Vec<JobPosting>,
    /// Raw extractions the jobs were built from
    #[serde(default)]
    pub extractions: Vec<Extraction>,
}

impl JobReport {
    pub fn new(source: impl Into<String>, jobs: Vec<JobPosting>) -> Self {
        Self {
            source: source.into(),
            page_title: None,
            section_count: 0,
            generated_at: Utc::now(),
            jobs,
            extractions: Vec::new(),
        }
    }
}

/// Plain-text listing of the report's postings.
pub fn render_text(report: &JobReport) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push('\n');
    out.push_str(&heavy);
    out.push_str("\nFINAL EXTRACTED JOB POSTINGS\n");
    out.push_str(&heavy);
    out.push('\n');

    if report.jobs.is_empty() {
        out.push_str("No valid job postings found after filtering.\n");
        return out;
    }

    for (i, job) in report.jobs.iter().enumerate() {
        out.push_str(&format!("\nJob {}:\n", i + 1));
        out.push_str(&format!("title: {}\n", job.title));
        out.push_str(&format!("location: {}\n", job.location_or_none()));
        out.push_str(&format!("description: {}\n", job.description));
        out.push_str(&light);
        out.push('\n');
    }

    out.push_str(&format!("\nTotal unique jobs found: {}\n", report.jobs.len()));
    out
}

/// Pretty-printed JSON form of the report.
pub fn render_json(report: &JobReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobReport {
        JobReport::new(
            "https://example.com/careers",
            vec![
                JobPosting {
                    title: "Web Developer".to_string(),
                    location: Some("Lahore".to_string()),
                    description: "Build and maintain client websites.".to_string(),
                },
                JobPosting {
                    title: "Data Analyst".to_string(),
                    location: None,
                    description: "Own the reporting stack.".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample());
        assert!(text.contains(&format!("{}\nFINAL EXTRACTED JOB POSTINGS\n", "=".repeat(80))));
        assert!(text.contains(
            "\nJob 1:\ntitle: Web Developer\nlocation: Lahore\ndescription: Build and maintain client websites.\n"
        ));
        assert!(text.contains("\nJob 2:\ntitle: Data Analyst\nlocation: None\n"));
        assert_eq!(text.matches(&"-".repeat(80)).count(), 2);
        assert!(text.ends_with("\nTotal unique jobs found: 2\n"));
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text(&JobReport::new("page.html", vec![]));
        assert!(text.ends_with("No valid job postings found after filtering.\n"));
        assert!(!text.contains("Total unique jobs"));
    }

    #[test]
    fn test_render_json() {
        let report = sample();
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["jobs"][0]["title"], "Web Developer");
        assert!(value["jobs"][1]["location"].is_null());
        assert!(value.get("page_title").is_none());

        let back: JobReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
