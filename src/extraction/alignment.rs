//! Source grounding: locating extracted text in the source.
//!
//! Each extraction is tried, in order, as an exact match, a case-insensitive
//! match and finally a fuzzy word-window match. Offsets are in characters.

use std::collections::HashMap;

use super::types::{AlignmentStatus, CharInterval, Extraction};

/// Aligns extractions against the text they were extracted from.
#[derive(Debug, Clone)]
pub struct Aligner {
    fuzzy_threshold: f64,
}

/// A lowercase word and its character span in the source.
#[derive(Debug)]
struct Token {
    text: String,
    start: usize,
    end: usize,
}

impl Aligner {
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    /// Ground every extraction in `source`, setting interval and status.
    ///
    /// Both exact and case-insensitive matches are searched from just after
    /// the previous match before falling back to the start of the text, so
    /// repeated values bind to successive occurrences. Extractions that
    /// cannot be located keep `char_interval == None`.
    pub fn align(&self, source: &str, extractions: &mut [Extraction]) {
        let source_chars: Vec<char> = source.chars().collect();
        let folded_source: Vec<char> = source_chars.iter().map(|c| fold(*c)).collect();
        let tokens = tokenize(&source_chars);
        let mut cursor = 0;

        for extraction in extractions.iter_mut() {
            extraction.char_interval = None;
            extraction.alignment_status = None;

            let needle: Vec<char> = extraction.extraction_text.trim().chars().collect();
            if needle.is_empty() {
                continue;
            }

            // Exact then case-insensitive after the cursor, then the same
            // two from the start of the text.
            let folded: Vec<char> = needle.iter().map(|c| fold(*c)).collect();
            let found = [cursor, 0]
                .into_iter()
                .filter_map(|from| {
                    find_chars(&source_chars, &needle, from)
                        .map(|start| (start, AlignmentStatus::MatchExact))
                        .or_else(|| {
                            find_chars(&folded_source, &folded, from)
                                .map(|start| (start, AlignmentStatus::MatchCaseInsensitive))
                        })
                })
                .next();

            if let Some((start, status)) = found {
                let interval = CharInterval::new(start, start + needle.len());
                cursor = interval.end_pos;
                extraction.char_interval = Some(interval);
                extraction.alignment_status = Some(status);
                continue;
            }

            if let Some(interval) = self.fuzzy_match(&tokens, &needle) {
                cursor = interval.end_pos;
                extraction.char_interval = Some(interval);
                extraction.alignment_status = Some(AlignmentStatus::MatchFuzzy);
            }
        }
    }

    /// Best window of source words covering enough of the needle's words.
    fn fuzzy_match(&self, tokens: &[Token], needle: &[char]) -> Option<CharInterval> {
        let needle_tokens = tokenize(needle);
        let window = needle_tokens.len();
        if window == 0 || window > tokens.len() || self.fuzzy_threshold <= 0.0 {
            return None;
        }

        let mut wanted: HashMap<&str, usize> = HashMap::new();
        for token in &needle_tokens {
            *wanted.entry(token.text.as_str()).or_insert(0) += 1;
        }

        let mut best: Option<(f64, usize)> = None;
        for start in 0..=(tokens.len() - window) {
            let mut remaining = wanted.clone();
            let mut matched = 0usize;
            for token in &tokens[start..start + window] {
                if let Some(count) = remaining.get_mut(token.text.as_str()) {
                    if *count > 0 {
                        *count -= 1;
                        matched += 1;
                    }
                }
            }
            let score = matched as f64 / window as f64;
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, start));
            }
        }

        let (score, start) = best?;
        if score < self.fuzzy_threshold {
            return None;
        }

        // Trim window edges that matched nothing.
        let slice = &tokens[start..start + window];
        let first = slice
            .iter()
            .position(|t| wanted.contains_key(t.text.as_str()))?;
        let last = slice
            .iter()
            .rposition(|t| wanted.contains_key(t.text.as_str()))?;
        Some(CharInterval::new(slice[first].start, slice[last].end))
    }
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(0.75)
    }
}

/// Single-char lowercase so folded text keeps the same char offsets.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Split into alphanumeric words with character spans.
fn tokenize(chars: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(make_token(chars, s, i));
        }
    }
    if let Some(s) = start {
        tokens.push(make_token(chars, s, chars.len()));
    }
    tokens
}

fn make_token(chars: &[char], start: usize, end: usize) -> Token {
    Token {
        text: chars[start..end].iter().map(|c| fold(*c)).collect(),
        start,
        end,
    }
}
