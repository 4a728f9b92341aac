//! Extraction data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Half-open span of character (not byte) offsets into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharInterval {
    pub start_pos: usize,
    pub end_pos: usize,
}

impl CharInterval {
    pub fn new(start_pos: usize, end_pos: usize) -> Self {
        Self { start_pos, end_pos }
    }

    pub fn len(&self) -> usize {
        self.end_pos.saturating_sub(self.start_pos)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two intervals share at least one character.
    pub fn overlaps(&self, other: &CharInterval) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start_pos < other.end_pos
            && other.start_pos < self.end_pos
    }

    /// Move the interval right by `offset` characters.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            start_pos: self.start_pos + offset,
            end_pos: self.end_pos + offset,
        }
    }
}

/// How an extraction was located in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// Verbatim match.
    MatchExact,
    /// Match ignoring letter case.
    MatchCaseInsensitive,
    /// Token window with enough overlapping words.
    MatchFuzzy,
}

/// A single extracted value, optionally grounded to the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub extraction_class: String,
    pub extraction_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_interval: Option<CharInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_status: Option<AlignmentStatus>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Position in the document's extraction list.
    #[serde(default)]
    pub extraction_index: usize,
}

impl Extraction {
    pub fn new(extraction_class: impl Into<String>, extraction_text: impl Into<String>) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            char_interval: None,
            alignment_status: None,
            attributes: BTreeMap::new(),
            extraction_index: 0,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the extraction has been located in the source.
    pub fn is_grounded(&self) -> bool {
        self.char_interval.is_some()
    }
}

/// A few-shot example: input text and the extractions expected from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleData {
    pub text: String,
    pub extractions: Vec<Extraction>,
}

impl ExampleData {
    pub fn new(text: impl Into<String>, extractions: Vec<Extraction>) -> Self {
        Self {
            text: text.into(),
            extractions,
        }
    }
}

/// A source text together with everything extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub document_id: String,
    pub text: String,
    pub extractions: Vec<Extraction>,
}

impl AnnotatedDocument {
    /// Extractions that were located in the text.
    pub fn grounded(&self) -> impl Iterator<Item = &Extraction> {
        self.extractions.iter().filter(|e| e.is_grounded())
    }

    /// The source text covered by an interval.
    pub fn span_text(&self, interval: &CharInterval) -> String {
        self.text
            .chars()
            .skip(interval.start_pos)
            .take(interval.len())
            .collect()
    }

    /// Distinct extraction classes in first-seen order.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        for extraction in &self.extractions {
            if !classes.contains(&extraction.extraction_class.as_str()) {
                classes.push(&extraction.extraction_class);
            }
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_overlap() {
        let a = CharInterval::new(0, 5);
        assert!(a.overlaps(&CharInterval::new(4, 8)));
        assert!(!a.overlaps(&CharInterval::new(5, 8)));
        assert!(!CharInterval::new(3, 3).overlaps(&a));
        assert!(!a.overlaps(&CharInterval::new(3, 3)));
        assert_eq!(a.shifted(10), CharInterval::new(10, 15));
    }

    #[test]
    fn test_span_text_uses_char_offsets() {
        let doc = AnnotatedDocument {
            document_id: "d".to_string(),
            text: "Café Manager, Lahore".to_string(),
            extractions: vec![],
        };
        assert_eq!(doc.span_text(&CharInterval::new(5, 12)), "Manager");
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let extraction = Extraction::new("title", "Web Developer");
        let json = serde_json::to_string(&extraction).unwrap();
        assert!(!json.contains("char_interval"));
        assert!(!json.contains("attributes"));

        let grounded = Extraction {
            char_interval: Some(CharInterval::new(1, 4)),
            alignment_status: Some(AlignmentStatus::MatchExact),
            ..Extraction::new("title", "Web")
        };
        let json = serde_json::to_string(&grounded).unwrap();
        assert!(json.contains(r#""alignment_status":"match_exact""#));
        let back: Extraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grounded);
    }

    #[test]
    fn test_classes_first_seen_order() {
        let doc = AnnotatedDocument {
            document_id: "d".to_string(),
            text: String::new(),
            extractions: vec![
                Extraction::new("title", "a"),
                Extraction::new("location", "b"),
                Extraction::new("title", "c"),
            ],
        };
        assert_eq!(doc.classes(), vec!["title", "location"]);
    }
}
