//! Text normalizer. Tokenizes the transcript once; every scorer works off
//! these immutable derived views.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern compiles"));
static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence split pattern compiles"));

#[derive(Debug, Clone)]
pub struct Transcript {
    raw: String,
    lowered: String,
    words: Vec<String>,
    /// Byte offset of each word within `lowered`.
    word_starts: Vec<usize>,
    /// Sentences in original casing, trimmed and non-empty.
    sentences: Vec<String>,
}

impl Transcript {
    pub fn new(text: &str) -> Self {
        let raw = text.to_string();
        let lowered = raw.to_lowercase();

        let mut words = Vec::new();
        let mut word_starts = Vec::new();
        for found in WORD_RE.find_iter(&lowered) {
            words.push(found.as_str().to_string());
            word_starts.push(found.start());
        }

        let sentences = SENTENCE_SPLIT_RE
            .split(&raw)
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            raw,
            lowered,
            words,
            word_starts,
            sentences,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lowercased text used for phrase and pattern matching.
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of the word containing (or last starting before) the given
    /// byte offset into the lowered text.
    pub fn word_index_at(&self, byte_offset: usize) -> usize {
        self.word_starts
            .partition_point(|&start| start <= byte_offset)
            .saturating_sub(1)
    }

    /// Prefix of the lowered text covering the first `n_words` words; the
    /// whole text when it is shorter than the window.
    pub fn opening_window(&self, n_words: usize) -> &str {
        match self.word_starts.get(n_words) {
            Some(&end) => &self.lowered[..end],
            None => &self.lowered,
        }
    }
}
