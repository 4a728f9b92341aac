//! Splitting long documents into model-sized chunks.
//!
//! Chunks concatenate back to the original text, so a chunk's character
//! offset maps its local grounding offsets onto the whole document.

/// A contiguous piece of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    /// Offset of the chunk's first character in the document.
    pub char_offset: usize,
}

/// Boundaries tried in order when a piece is too long.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Paragraph breaks are preferred, then line breaks, sentence ends and
/// spaces; a run with no boundary at all is cut at `max_chars`.
/// Whitespace-only chunks are dropped.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let max_chars = max_chars.max(1);
    if text.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    split_pieces(text, max_chars, SEPARATORS, &mut pieces);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut current_offset = 0usize;
    let mut offset = 0usize;

    for piece in pieces {
        let piece_len = piece.chars().count();
        if current_len + piece_len > max_chars && current_len > 0 {
            push_chunk(&mut chunks, std::mem::take(&mut current), current_offset);
            current_len = 0;
        }
        if current_len == 0 {
            current_offset = offset;
        }
        current.push_str(piece);
        current_len += piece_len;
        offset += piece_len;
    }
    push_chunk(&mut chunks, current, current_offset);

    chunks
}

fn push_chunk(chunks: &mut Vec<TextChunk>, text: String, char_offset: usize) {
    if !text.trim().is_empty() {
        chunks.push(TextChunk { text, char_offset });
    }
}

/// Recursively break `text` into pieces no longer than `max_chars`.
fn split_pieces<'a>(text: &'a str, max_chars: usize, separators: &[&str], out: &mut Vec<&'a str>) {
    if text.chars().count() <= max_chars {
        out.push(text);
        return;
    }

    let Some((separator, rest)) = separators.split_first() else {
        hard_split(text, max_chars, out);
        return;
    };

    for part in text.split_inclusive(separator) {
        if part.chars().count() <= max_chars {
            out.push(part);
        } else {
            split_pieces(part, max_chars, rest, out);
        }
    }
}

fn hard_split<'a>(text: &'a str, max_chars: usize, out: &mut Vec<&'a str>) {
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            out.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
}
