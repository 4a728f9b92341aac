//! Chunked few-shot extraction over a whole document.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::alignment::Aligner;
use super::chunking::{chunk_text, TextChunk};
use super::config::ExtractionSettings;
use super::prompt::PromptTemplate;
use super::resolver::parse_output;
use super::types::{AnnotatedDocument, Extraction};
use super::ExtractionError;
use crate::llm::LanguageModel;

/// Runs a prompt template over a document and grounds the answers.
pub struct Annotator {
    model: Arc<dyn LanguageModel>,
    template: PromptTemplate,
    settings: ExtractionSettings,
    aligner: Aligner,
}

impl Annotator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        template: PromptTemplate,
        settings: ExtractionSettings,
    ) -> Self {
        let aligner = Aligner::new(settings.fuzzy_threshold);
        let template = template.with_fence_output(settings.fence_output);
        Self {
            model,
            template,
            settings,
            aligner,
        }
    }

    /// Model identifier used for inference.
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Extract from `text`, returning grounded extractions in document order.
    pub async fn annotate(
        &self,
        document_id: &str,
        text: &str,
    ) -> Result<AnnotatedDocument, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::InvalidInput(
                "document text is empty".to_string(),
            ));
        }

        let chunks = chunk_text(text, self.settings.max_chunk_chars);
        let passes = self.settings.passes.max(1);
        info!(
            "Annotating '{}' with {}: {} chunk(s), {} pass(es)",
            document_id,
            self.model.model_id(),
            chunks.len(),
            passes
        );

        let mut extractions: Vec<Extraction> = Vec::new();
        for pass in 0..passes {
            let found = self.run_pass(&chunks).await?;
            if pass == 0 {
                extractions = found;
            } else {
                let added = merge_pass(&mut extractions, found);
                debug!("Pass {} added {} extraction(s)", pass + 1, added);
            }
        }

        for (index, extraction) in extractions.iter_mut().enumerate() {
            extraction.extraction_index = index;
        }

        Ok(AnnotatedDocument {
            document_id: document_id.to_string(),
            text: text.to_string(),
            extractions,
        })
    }

    /// One pass over all chunks, concurrently, keeping chunk order.
    ///
    /// Model errors abort the pass. Unparseable answers only drop their
    /// chunk, unless no chunk could be parsed at all.
    async fn run_pass(&self, chunks: &[TextChunk]) -> Result<Vec<Extraction>, ExtractionError> {
        let workers = self.settings.max_workers.max(1);
        let results: Vec<Result<Vec<Extraction>, ExtractionError>> = stream::iter(chunks)
            .map(|chunk| self.process_chunk(chunk))
            .buffered(workers)
            .collect()
            .await;

        let mut extractions = Vec::new();
        let mut resolved_any = false;
        let mut last_resolve_error = None;

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(found) => {
                    resolved_any = true;
                    extractions.extend(found);
                }
                Err(ExtractionError::Resolve(msg)) => {
                    warn!("Skipping chunk {}: {}", index + 1, msg);
                    last_resolve_error = Some(ExtractionError::Resolve(msg));
                }
                Err(e) => return Err(e),
            }
        }

        match last_resolve_error {
            Some(err) if !resolved_any => Err(err),
            _ => Ok(extractions),
        }
    }

    async fn process_chunk(&self, chunk: &TextChunk) -> Result<Vec<Extraction>, ExtractionError> {
        let prompt = self.template.render(&chunk.text);
        let raw = self.model.infer(&prompt).await?;
        let mut extractions = parse_output(&raw, self.settings.fence_output)?;

        self.aligner.align(&chunk.text, &mut extractions);
        for extraction in &mut extractions {
            extraction.char_interval = extraction
                .char_interval
                .map(|interval| interval.shifted(chunk.char_offset));
        }

        debug!(
            "Chunk at {}: {} extraction(s), {} grounded",
            chunk.char_offset,
            extractions.len(),
            extractions.iter().filter(|e| e.is_grounded()).count()
        );
        Ok(extractions)
    }
}

/// Add extractions from a later pass that do not duplicate earlier ones.
///
/// Grounded extractions are dropped when they overlap an existing span;
/// ungrounded ones when the same class and text already exist.
fn merge_pass(existing: &mut Vec<Extraction>, found: Vec<Extraction>) -> usize {
    let mut added = 0;
    for extraction in found {
        let duplicate = match extraction.char_interval {
            Some(interval) => existing
                .iter()
                .filter_map(|e| e.char_interval)
                .any(|other| other.overlaps(&interval)),
            None => existing.iter().any(|e| {
                e.extraction_class == extraction.extraction_class
                    && e.extraction_text == extraction.extraction_text
            }),
        };
        if !duplicate {
            existing.push(extraction);
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{AlignmentStatus, CharInterval};
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers prompts from a fixed script, in call order.
    struct ScriptedModel {
        answers: Mutex<Vec<Result<String, LlmError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(answers: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn infer(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                Ok("```json\n{\"extractions\": []}\n```".to_string())
            } else {
                answers.remove(0)
            }
        }
    }

    fn settings(max_chunk_chars: usize, passes: usize) -> ExtractionSettings {
        ExtractionSettings {
            max_chunk_chars,
            max_workers: 1,
            passes,
            ..ExtractionSettings::default()
        }
    }

    #[tokio::test]
    async fn test_annotate_grounds_across_chunks() {
        let text = "Web Developer\nLahore\n\nData Analyst\nRemote";
        let model = ScriptedModel::new(vec![
            Ok(r#"```json
{"extractions": [{"title": "Web Developer"}, {"location": "Lahore"}]}
```"#
                .to_string()),
            Ok(r#"```json
{"extractions": [{"title": "Data Analyst"}, {"location": "Remote"}]}
```"#
                .to_string()),
        ]);
        let annotator = Annotator::new(model.clone(), PromptTemplate::jobs(), settings(25, 1));

        let doc = annotator.annotate("careers", text).await.unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
        assert_eq!(doc.extractions.len(), 4);

        let analyst = &doc.extractions[2];
        assert_eq!(analyst.extraction_text, "Data Analyst");
        assert_eq!(analyst.char_interval, Some(CharInterval::new(22, 34)));
        assert_eq!(doc.span_text(&analyst.char_interval.unwrap()), "Data Analyst");
        assert_eq!(analyst.extraction_index, 2);
        assert!(doc
            .extractions
            .iter()
            .all(|e| e.alignment_status == Some(AlignmentStatus::MatchExact)));
    }

    #[tokio::test]
    async fn test_unparseable_chunk_is_skipped() {
        let text = "Web Developer\nLahore\n\nData Analyst\nRemote";
        let model = ScriptedModel::new(vec![
            Ok("Sorry, I can't help with that.".to_string()),
            Ok(r#"{"extractions": [{"title": "Data Analyst"}]}"#.to_string()),
        ]);
        let annotator = Annotator::new(model, PromptTemplate::jobs(), settings(25, 1));

        let doc = annotator.annotate("careers", text).await.unwrap();
        assert_eq!(doc.extractions.len(), 1);
        assert_eq!(doc.extractions[0].extraction_text, "Data Analyst");
    }

    #[tokio::test]
    async fn test_all_chunks_unparseable_is_error() {
        let model = ScriptedModel::new(vec![Ok("no json here".to_string())]);
        let annotator = Annotator::new(model, PromptTemplate::jobs(), settings(1000, 1));
        assert!(matches!(
            annotator.annotate("careers", "Intern").await,
            Err(ExtractionError::Resolve(_))
        ));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let model = ScriptedModel::new(vec![Err(LlmError::Disabled)]);
        let annotator = Annotator::new(model, PromptTemplate::jobs(), settings(1000, 1));
        assert!(matches!(
            annotator.annotate("careers", "Intern").await,
            Err(ExtractionError::Llm(LlmError::Disabled))
        ));
    }

    #[tokio::test]
    async fn test_empty_document_rejected() {
        let model = ScriptedModel::new(vec![]);
        let annotator = Annotator::new(model.clone(), PromptTemplate::jobs(), settings(1000, 1));
        assert!(matches!(
            annotator.annotate("careers", "  \n").await,
            Err(ExtractionError::InvalidInput(_))
        ));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_pass_only_adds_new_spans() {
        let text = "Intern\nRemote\nDesigner\nLahore";
        let model = ScriptedModel::new(vec![
            Ok(r#"{"extractions": [{"title": "Intern"}, {"description": "Paid internship"}]}"#
                .to_string()),
            Ok(r#"{"extractions": [{"title": "Intern"}, {"title": "Designer"}, {"description": "Paid internship"}]}"#
                .to_string()),
        ]);
        let annotator = Annotator::new(model, PromptTemplate::jobs(), settings(1000, 2));

        let doc = annotator.annotate("careers", text).await.unwrap();
        let texts: Vec<&str> = doc
            .extractions
            .iter()
            .map(|e| e.extraction_text.as_str())
            .collect();
        assert_eq!(texts, vec!["Intern", "Paid internship", "Designer"]);
        assert_eq!(doc.extractions[2].extraction_index, 2);
    }

    /// Echoes the chunk back as a `word` extraction; "Alpha" answers slowest.
    struct SlowFirstModel {
        finished: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for SlowFirstModel {
        fn model_id(&self) -> &str {
            "slow-first"
        }

        async fn infer(&self, prompt: &str) -> Result<String, LlmError> {
            let chunk = prompt
                .rsplit("Q: ")
                .next()
                .unwrap_or_default()
                .trim_end_matches("\nA: ")
                .trim()
                .to_string();
            if chunk == "Alpha" {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
            self.finished.lock().unwrap().push(chunk.clone());
            Ok(format!(r#"{{"extractions": [{{"word": "{}"}}]}}"#, chunk))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_chunks_keep_document_order() {
        let model = Arc::new(SlowFirstModel {
            finished: Mutex::new(Vec::new()),
        });
        let settings = ExtractionSettings {
            max_chunk_chars: 9,
            max_workers: 4,
            ..ExtractionSettings::default()
        };
        let annotator = Annotator::new(
            model.clone(),
            PromptTemplate::new("Find words.", vec![]),
            settings,
        );

        let doc = annotator
            .annotate("words", "Alpha\n\nBravo\n\nCharlie")
            .await
            .unwrap();

        assert_eq!(*model.finished.lock().unwrap(), vec!["Bravo", "Charlie", "Alpha"]);
        let spans: Vec<(&str, Option<CharInterval>)> = doc
            .extractions
            .iter()
            .map(|e| (e.extraction_text.as_str(), e.char_interval))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("Alpha", Some(CharInterval::new(0, 5))),
                ("Bravo", Some(CharInterval::new(7, 12))),
                ("Charlie", Some(CharInterval::new(14, 21))),
            ]
        );
    }
}
