//! Sentence and word level splitting used by the chunker.

use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("Invalid regex"));

/// Split text into sentences, keeping each terminator and the whitespace
/// after it attached to the sentence it ends.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END.find_iter(text) {
        out.push(&text[last..m.end()]);
        last = m.end();
    }
    if last < text.len() {
        out.push(&text[last..]);
    }

    out
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split a word into pieces of at most `max_len` characters.
pub fn hard_split(word: &str, max_len: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in word.char_indices() {
        if count == max_len {
            pieces.push(&word[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < word.len() {
        pieces.push(&word[start..]);
    }

    pieces
}
