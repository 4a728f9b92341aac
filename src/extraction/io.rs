//! JSONL persistence for annotated documents.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::types::AnnotatedDocument;
use super::ExtractionError;

/// Write documents to `path`, one JSON object per line.
pub fn save_annotated_documents(
    path: &Path,
    documents: &[AnnotatedDocument],
) -> Result<(), ExtractionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for document in documents {
        serde_json::to_writer(&mut writer, document)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!(
        "Saved {} annotated document(s) to {}",
        documents.len(),
        path.display()
    );
    Ok(())
}

/// Read documents written by [`save_annotated_documents`]. Blank lines are skipped.
pub fn load_annotated_documents(path: &Path) -> Result<Vec<AnnotatedDocument>, ExtractionError> {
    let reader = BufReader::new(File::open(path)?);
    let mut documents = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        documents.push(serde_json::from_str(&line)?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{CharInterval, Extraction};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("jobs.jsonl");

        let mut title = Extraction::new("title", "Intern");
        title.char_interval = Some(CharInterval::new(0, 6));
        let documents = vec![
            AnnotatedDocument {
                document_id: "careers".to_string(),
                text: "Intern\nRemote".to_string(),
                extractions: vec![title],
            },
            AnnotatedDocument {
                document_id: "empty".to_string(),
                text: "nothing".to_string(),
                extractions: vec![],
            },
        ];

        save_annotated_documents(&path, &documents).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);

        let loaded = load_annotated_documents(&path).unwrap();
        assert_eq!(loaded, documents);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();
        assert!(matches!(
            load_annotated_documents(&path),
            Err(ExtractionError::Json(_))
        ));
    }
}
