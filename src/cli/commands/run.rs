//! Full extraction run: fetch, split, extract, consolidate, report.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use super::OutputFormat;
use crate::cli::helpers::{load_source, prompt_template, section_splitter, spinner};
use crate::config::Settings;
use crate::extraction::{save_annotated_documents, Annotator};
use crate::jobs::{consolidate, filter_jobs};
use crate::llm::{LanguageModel, LlmClient};
use crate::report::{render_html, render_json, render_text, JobReport};
use crate::scrapers::combine_sections;

/// Flags of the `run` command.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub model: Option<String>,
    pub format: OutputFormat,
    pub html: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub filter: bool,
    pub max_chunk_chars: Option<usize>,
    pub workers: Option<usize>,
    pub passes: Option<usize>,
}

impl RunOptions {
    /// Apply command-line overrides on top of loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(model) = &self.model {
            settings.llm.model = model.clone();
        }
        if let Some(max_chunk_chars) = self.max_chunk_chars {
            settings.extraction.max_chunk_chars = max_chunk_chars;
        }
        if let Some(workers) = self.workers {
            settings.extraction.max_workers = workers;
        }
        if let Some(passes) = self.passes {
            settings.extraction.passes = passes;
        }
    }
}

/// Extract job postings from a URL or file.
pub async fn cmd_run(mut settings: Settings, source: &str, options: RunOptions) -> anyhow::Result<()> {
    options.apply(&mut settings);

    eprintln!(
        "{} Extracting job sections from {}",
        style("→").cyan(),
        style(source).bold()
    );
    let page = load_source(&settings, source).await?;

    let sections = section_splitter(&settings)?.split(&page.text);
    if sections.is_empty() {
        println!("No job sections found.");
        return Ok(());
    }
    eprintln!("  {} Found {} text sections", style("→").dim(), sections.len());

    let combined = combine_sections(&sections, &settings.extraction.section_separator);

    let model: Arc<dyn LanguageModel> = Arc::new(LlmClient::new(settings.llm.clone())?);
    let annotator = Annotator::new(model, prompt_template(&settings), settings.extraction.clone());

    let pb = spinner(format!("Extracting with {}...", annotator.model_id()));
    let document = annotator.annotate(&page.source, &combined).await;
    pb.finish_and_clear();
    let document = document?;

    if let Some(path) = &options.save {
        save_annotated_documents(path, std::slice::from_ref(&document))?;
        eprintln!(
            "{} Saved annotated document to {}",
            style("✓").green(),
            path.display()
        );
    }

    if document.extractions.is_empty() {
        println!("No extractions found.");
        return Ok(());
    }

    eprintln!(
        "  {} {} extractions ({} grounded), consolidating duplicate jobs",
        style("→").dim(),
        document.extractions.len(),
        document.grounded().count()
    );
    let mut jobs = consolidate(&document.extractions, &settings.jobs);
    if options.filter {
        jobs = filter_jobs(jobs, &settings.jobs);
    }

    let mut report = JobReport::new(page.source.clone(), jobs);
    report.page_title = page.title.clone();
    report.section_count = sections.len();
    report.extractions = document.extractions.clone();

    if let Some(path) = &options.html {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, render_html(&document, &report.jobs))?;
        eprintln!(
            "{} Wrote visualization to {}",
            style("✓").green(),
            path.display()
        );
    }

    match options.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    Ok(())
}
