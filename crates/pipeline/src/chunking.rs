//! Split document text into sentence or paragraph units for embedding.

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Sentence boundary: `.`/`?`/`!` followed by whitespace, guarded against
/// dotted tokens (`e.g.`) and capitalized abbreviations (`Dr.`).
static SENTENCE_ENDINGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?<!\w\.\w.)(?<![A-Z][a-z]\.)(?<=[.?!])\s").expect("sentence pattern is valid")
});

/// Chunking unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Sentence,
    Paragraph,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Sentence => "sentence",
            Granularity::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentence" => Ok(Granularity::Sentence),
            "paragraph" => Ok(Granularity::Paragraph),
            other => Err(PipelineError::UnknownGranularity {
                name: other.to_string(),
            }),
        }
    }
}

/// Knobs for [`chunk_text`].
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Paragraph boundary for paragraph granularity
    pub paragraph_delimiter: String,
    /// Minimum sentence length in chars; shorter fragments are dropped
    pub min_sentence_len: usize,
    /// Minimum paragraph length in chars
    pub min_paragraph_len: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        ChunkOptions {
            paragraph_delimiter: "\n\n".to_string(),
            min_sentence_len: 10,
            min_paragraph_len: 20,
        }
    }
}

/// Sentences grouped per paragraph chunk when falling back from
/// delimiter-based paragraph splitting.
const SENTENCES_PER_PARAGRAPH: usize = 3;

/// Paragraph chunks longer than this are split further.
const MAX_PARAGRAPH_CHARS: usize = 1024;

/// Chunk one document at the given granularity.
pub fn chunk_text(text: &str, granularity: Granularity, options: &ChunkOptions) -> Vec<String> {
    match granularity {
        Granularity::Sentence => split_sentences(text, options.min_sentence_len),
        Granularity::Paragraph => split_paragraphs(
            text,
            &options.paragraph_delimiter,
            options.min_paragraph_len,
        ),
    }
}

/// Split into sentences: first by `\n\n` paragraphs (dropping paragraphs of
/// 20 chars or fewer), then on sentence endings, dropping fragments shorter
/// than `min_len`.
pub fn split_sentences(text: &str, min_len: usize) -> Vec<String> {
    let mut sentences = Vec::new();
    for para in text.split("\n\n") {
        let para = para.trim();
        if para.len() <= 20 {
            continue;
        }
        for sent in split_on_endings(para) {
            let sent = sent.trim();
            if sent.len() >= min_len {
                sentences.push(sent.to_string());
            }
        }
    }
    sentences
}

fn split_on_endings(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    // The match is the boundary whitespace itself; the terminator stays with
    // the preceding sentence via lookbehind.
    for m in SENTENCE_ENDINGS.find_iter(text).flatten() {
        parts.push(&text[last..m.start()]);
        last = m.end();
    }
    parts.push(&text[last..]);
    parts
}

/// Split into paragraphs by `delimiter`, keeping trimmed chunks of at least
/// `min_len` chars.
///
/// When that yields a single chunk (flat text with no delimiter), falls
/// back to grouping sentences [`SENTENCES_PER_PARAGRAPH`] at a time;
/// oversized groups are halved on a sentence boundary, and any chunk still
/// longer than [`MAX_PARAGRAPH_CHARS`] is wrapped on word boundaries.
pub fn split_paragraphs(text: &str, delimiter: &str, min_len: usize) -> Vec<String> {
    let chunks: Vec<String> = text
        .split(delimiter)
        .map(str::trim)
        .filter(|c| c.len() >= min_len)
        .map(String::from)
        .collect();
    if chunks.len() > 1 {
        return chunks;
    }

    let sentences = split_sentences(text, 10);
    if sentences.is_empty() {
        return chunks;
    }

    let mut grouped: Vec<String> = Vec::new();
    for group in sentences.chunks(SENTENCES_PER_PARAGRAPH) {
        let chunk = group.join(" ");
        if chunk.len() > MAX_PARAGRAPH_CHARS && group.len() > 1 {
            let mid = group.len() / 2;
            grouped.push(group[..mid].join(" "));
            grouped.push(group[mid..].join(" "));
        } else {
            grouped.push(chunk);
        }
    }

    let mut result: Vec<String> = Vec::new();
    for chunk in grouped {
        if chunk.len() <= MAX_PARAGRAPH_CHARS {
            result.push(chunk);
        } else {
            wrap_on_words(&chunk, MAX_PARAGRAPH_CHARS, &mut result);
        }
    }
    result.retain(|c| c.len() >= min_len);
    result
}

/// Hard-wrap `chunk` into pieces of at most `max_chars`, cutting at the last
/// space before the limit when one exists.
fn wrap_on_words(chunk: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut rest = chunk;
    while rest.len() > max_chars {
        let mut limit = max_chars;
        while !rest.is_char_boundary(limit) {
            limit -= 1;
        }
        let cut = match rest[..limit].rfind(' ') {
            Some(0) | None => limit,
            Some(c) => c,
        };
        out.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start();
    }
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("sentence".parse::<Granularity>().unwrap(), Granularity::Sentence);
        assert_eq!(
            "paragraph".parse::<Granularity>().unwrap(),
            Granularity::Paragraph
        );
        assert!(matches!(
            "word".parse::<Granularity>(),
            Err(PipelineError::UnknownGranularity { .. })
        ));
    }

    #[test]
    fn test_split_sentences_basic() {
        let text = "The quick brown fox jumps. It lands on the lazy dog! Was the dog surprised?";
        let sentences = split_sentences(text, 10);
        assert_eq!(
            sentences,
            vec![
                "The quick brown fox jumps.",
                "It lands on the lazy dog!",
                "Was the dog surprised?"
            ]
        );
    }

    #[test]
    fn test_split_sentences_drops_short_fragments() {
        let text = "This sentence is long enough to keep. No. Also long enough to survive here.";
        let sentences = split_sentences(text, 10);
        assert_eq!(sentences.len(), 2);
        assert!(sentences.iter().all(|s| s.len() >= 10));
    }

    #[test]
    fn test_split_sentences_drops_short_paragraphs() {
        let text = "Too short.\n\nThis paragraph is comfortably long enough. It has two sentences in it.";
        let sentences = split_sentences(text, 10);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_split_sentences_keeps_abbreviations_together() {
        let text = "The committee met with Dr. Smith yesterday afternoon. A decision follows shortly.";
        let sentences = split_sentences(text, 10);
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("Dr. Smith"));
    }

    #[test]
    fn test_split_paragraphs_by_delimiter() {
        let text = "First paragraph with enough text.\n\nSecond paragraph, also long enough.";
        let paras = split_paragraphs(text, "\n\n", 20);
        assert_eq!(paras.len(), 2);
    }

    #[test]
    fn test_split_paragraphs_flat_text_groups_sentences() {
        let text = "One full sentence right here. Another full sentence follows it. A third one rounds it out. And a fourth for the next group.";
        let paras = split_paragraphs(text, "\n\n", 20);
        // 4 sentences grouped 3 at a time.
        assert_eq!(paras.len(), 2);
        assert!(paras[0].contains("third"));
        assert!(paras[1].contains("fourth"));
    }

    #[test]
    fn test_split_paragraphs_wraps_oversized_chunks() {
        let word = "word ";
        let text = word.repeat(400); // ~2000 chars, no sentence endings
        let paras = split_paragraphs(&text, "\n\n", 20);
        assert!(paras.len() >= 2);
        assert!(paras.iter().all(|p| p.len() <= 1024));
    }

    #[test]
    fn test_chunk_text_dispatch() {
        let text = "A first full sentence lives here. A second full sentence follows.";
        let opts = ChunkOptions::default();
        let sentences = chunk_text(text, Granularity::Sentence, &opts);
        assert_eq!(sentences.len(), 2);
        let paras = chunk_text(text, Granularity::Paragraph, &opts);
        assert_eq!(paras.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("", 10).is_empty());
        assert!(split_paragraphs("", "\n\n", 20).is_empty());
    }
}
