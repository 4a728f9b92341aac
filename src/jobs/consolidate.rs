//! Merging extractions into one posting per position.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{JobPosting, JobSettings};
use crate::extraction::Extraction;
use crate::utils::{dedup_key, similarity};

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Location values that mean "not specified".
const ABSENT_LOCATIONS: &[&str] = &["none", "n/a", "na", "not specified"];

#[derive(Debug)]
struct JobGroup {
    key: String,
    title: String,
    locations: Vec<String>,
    descriptions: Vec<String>,
}

/// Group extractions by job title and merge their details.
///
/// Extractions are read in order: a `title` opens (or reopens) a group and
/// following `location`/`description` values attach to it. Values seen
/// before any title are dropped, as is anything mentioning a skip term.
pub fn consolidate(extractions: &[Extraction], settings: &JobSettings) -> Vec<JobPosting> {
    let skip_terms: Vec<String> = settings
        .skip_terms
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut groups: Vec<JobGroup> = Vec::new();
    let mut current: Option<usize> = None;

    for extraction in extractions {
        let text = extraction.extraction_text.trim();
        let lower = text.to_lowercase();
        if skip_terms.iter().any(|term| lower.contains(term.as_str())) {
            debug!("Skipping '{}': matches skip term", text);
            continue;
        }

        match extraction.extraction_class.to_lowercase().as_str() {
            "title" => {
                if text.is_empty() {
                    continue;
                }
                let key = lower.trim().to_string();
                let existing = groups.iter().position(|g| {
                    g.key == key || similarity(&g.key, &key) >= settings.title_similarity
                });
                current = Some(match existing {
                    Some(index) => index,
                    None => {
                        groups.push(JobGroup {
                            key,
                            title: text.to_string(),
                            locations: Vec::new(),
                            descriptions: Vec::new(),
                        });
                        groups.len() - 1
                    }
                });
            }
            "location" => {
                let Some(index) = current else {
                    continue;
                };
                if is_absent_location(text) {
                    continue;
                }
                let group = &mut groups[index];
                if !group.locations.iter().any(|l| l == text) {
                    group.locations.push(text.to_string());
                }
            }
            "description" => {
                if let Some(index) = current {
                    groups[index].descriptions.push(text.to_string());
                }
            }
            _ => {}
        }
    }

    groups
        .into_iter()
        .map(|group| JobPosting {
            description: merge_descriptions(&group.descriptions, settings.min_sentence_chars),
            location: group.locations.into_iter().next(),
            title: group.title,
        })
        .collect()
}

/// Merge descriptions sentence by sentence, dropping fragments and repeats.
///
/// Sentences must be longer than `min_sentence_chars`. Two sentences are
/// repeats when they agree after lowercasing and removing non-word
/// characters. The result is terminated with a period unless empty.
pub fn merge_descriptions<S: AsRef<str>>(descriptions: &[S], min_sentence_chars: usize) -> String {
    let mut seen = HashSet::new();
    let mut sentences: Vec<&str> = Vec::new();

    for description in descriptions {
        for sentence in SENTENCE_BOUNDARY.split(description.as_ref()) {
            let sentence = sentence.trim();
            if sentence.chars().count() <= min_sentence_chars {
                continue;
            }
            if seen.insert(dedup_key(sentence)) {
                sentences.push(sentence);
            }
        }
    }

    let mut merged = sentences.join(". ");
    if !merged.is_empty() && !merged.ends_with('.') {
        merged.push('.');
    }
    merged
}

fn is_absent_location(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.is_empty() || ABSENT_LOCATIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(class: &str, text: &str) -> Extraction {
        Extraction::new(class, text)
    }

    #[test]
    fn test_duplicate_titles_are_merged() {
        let extractions = vec![
            ex("title", "Project Manager"),
            ex("location", "Karachi, Pakistan"),
            ex("description", "Minimum 3 years experience required."),
            ex("title", "project manager "),
            ex("location", "Karachi, Pakistan"),
            ex(
                "description",
                "Requirements: Bachelor's degree, Agile experience. Minimum 3 years experience required!",
            ),
        ];
        let jobs = consolidate(&extractions, &JobSettings::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Project Manager");
        assert_eq!(jobs[0].location.as_deref(), Some("Karachi, Pakistan"));
        assert_eq!(
            jobs[0].description,
            "Minimum 3 years experience required. Requirements: Bachelor's degree, Agile experience."
        );
    }

    #[test]
    fn test_similar_titles_share_a_group() {
        let extractions = vec![
            ex("title", "Web Developer"),
            ex("title", "Data Analyst"),
            ex("title", "Web Developers"),
            ex("description", "Build and maintain client websites"),
        ];
        let jobs = consolidate(&extractions, &JobSettings::default());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].description, "Build and maintain client websites.");
        assert_eq!(jobs[1].description, "");
    }

    #[test]
    fn test_details_attach_to_current_title() {
        let extractions = vec![
            ex("location", "Lahore"),
            ex("description", "Orphaned description before any title"),
            ex("title", "Data Analyst"),
            ex("title", "Web Developer"),
            ex("title", "Data Analyst"),
            ex("location", "Remote"),
        ];
        let jobs = consolidate(&extractions, &JobSettings::default());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Data Analyst");
        assert_eq!(jobs[0].location.as_deref(), Some("Remote"));
        assert_eq!(jobs[1].location, None);
        assert!(jobs.iter().all(|j| j.description.is_empty()));
    }

    #[test]
    fn test_skip_terms_and_absent_locations() {
        let extractions = vec![
            ex("title", "Web Design Services"),
            ex("title", "Graphic Designer"),
            ex("location", "None"),
            ex("location", "N/A"),
            ex("description", "Experience with Figma is a plus"),
            ex("description", "Create visual assets for campaigns"),
            ex("salary", "Competitive"),
        ];
        let jobs = consolidate(&extractions, &JobSettings::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Graphic Designer");
        assert_eq!(jobs[0].location_or_none(), "None");
        assert_eq!(jobs[0].description, "Create visual assets for campaigns.");
    }

    #[test]
    fn test_merge_descriptions_drops_short_fragments() {
        let merged = merge_descriptions(
            &["Full time. Apply now!! Work with a friendly team?", "e.g. SQL"],
            10,
        );
        assert_eq!(merged, "Work with a friendly team.");
        assert_eq!(merge_descriptions::<&str>(&[], 10), "");
    }
}
