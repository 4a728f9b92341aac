//! Re-render saved annotated documents.

use std::path::{Path, PathBuf};

use console::style;

use crate::config::Settings;
use crate::extraction::load_annotated_documents;
use crate::jobs::{consolidate, filter_jobs};
use crate::report::render_html;

/// Write an HTML page for each document in a JSONL file.
///
/// A single document is written to `html`; several are written next to it
/// as `<stem>-<n>.html`.
pub fn cmd_render(settings: &Settings, input: &Path, html: &Path) -> anyhow::Result<()> {
    let documents = load_annotated_documents(input)?;
    if documents.is_empty() {
        anyhow::bail!("No annotated documents in {}", input.display());
    }

    if let Some(parent) = html.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    for (i, document) in documents.iter().enumerate() {
        let jobs = filter_jobs(consolidate(&document.extractions, &settings.jobs), &settings.jobs);
        let path = output_path(html, i, documents.len());
        std::fs::write(&path, render_html(document, &jobs))?;
        eprintln!(
            "{} {} -> {}",
            style("✓").green(),
            document.document_id,
            path.display()
        );
    }

    Ok(())
}

fn output_path(html: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return html.to_path_buf();
    }
    let stem = html
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    html.with_file_name(format!("{}-{}.html", stem, index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{save_annotated_documents, AnnotatedDocument, CharInterval, Extraction};

    #[test]
    fn test_output_path() {
        let html = Path::new("out/jobs.html");
        assert_eq!(output_path(html, 0, 1), PathBuf::from("out/jobs.html"));
        assert_eq!(output_path(html, 1, 3), PathBuf::from("out/jobs-2.html"));
    }

    #[test]
    fn test_render_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("docs.jsonl");
        let html = dir.path().join("site").join("jobs.html");

        let mut title = Extraction::new("title", "Web Developer");
        title.char_interval = Some(CharInterval::new(0, 13));
        let document = AnnotatedDocument {
            document_id: "careers".to_string(),
            text: "Web Developer\nLahore".to_string(),
            extractions: vec![title],
        };
        save_annotated_documents(&input, &[document]).unwrap();

        cmd_render(&Settings::default(), &input, &html).unwrap();
        let page = std::fs::read_to_string(&html).unwrap();
        assert!(page.contains(r#"<mark class="cls-title""#));
    }

    #[test]
    fn test_render_empty_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.jsonl");
        std::fs::write(&input, "").unwrap();
        assert!(cmd_render(&Settings::default(), &input, &dir.path().join("x.html")).is_err());
    }
}
