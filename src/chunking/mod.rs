//! Splitting long text into size-bounded chunks for delivery.
//!
//! Chat platforms and the translation API cap how much text one message may
//! carry. Text is cut at sentence boundaries first and at word boundaries only
//! when a single sentence is too long on its own. No chunk ever exceeds the
//! limit; lengths are counted in characters.

mod sentence;

use sentence::{char_len, hard_split, sentences};
use serde::{Deserialize, Serialize};

/// A size-bounded piece of a longer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Zero-based position of this chunk.
    pub index: usize,
    /// Number of chunks the text was split into.
    pub total: usize,
    pub content: String,
}

impl TextChunk {
    /// "Part i/n" label for user-facing framing.
    pub fn label(&self) -> String {
        format!("Part {}/{}", self.index + 1, self.total)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Content prefixed with its label when the text was split.
    pub fn framed(&self) -> String {
        if self.total > 1 {
            format!("{}:\n\n{}", self.label(), self.content)
        } else {
            self.content.clone()
        }
    }
}

/// Split `text` into chunks of at most `max_len` characters.
///
/// Returns no chunks for empty input and exactly one chunk when the text
/// already fits.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<TextChunk> {
    let pieces = split_text(text, max_len);
    let total = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, content)| TextChunk {
            index,
            total,
            content,
        })
        .collect()
}

/// Split `text` into chunks whose [`TextChunk::framed`] form stays within
/// `max_len` characters, label included.
pub fn chunk_framed(text: &str, max_len: usize) -> Vec<TextChunk> {
    let mut chunks = chunk_text(text, max_len);
    let mut total = chunks.len();

    while total > 1 {
        let overhead = frame_overhead(total);
        chunks = chunk_text(text, max_len.saturating_sub(overhead));
        if frame_overhead(chunks.len()) <= overhead {
            break;
        }
        total = chunks.len();
    }

    chunks
}

/// Characters the "Part i/n" frame adds to a chunk of a `total`-part text.
fn frame_overhead(total: usize) -> usize {
    TextChunk {
        index: total.saturating_sub(1),
        total,
        content: String::new(),
    }
    .framed()
    .chars()
    .count()
}

/// Split `text` into plain strings of at most `max_len` characters.
pub fn split_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);

    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_len {
        return vec![text.to_string()];
    }
    if text.trim().is_empty() {
        return hard_split(text, max_len)
            .into_iter()
            .map(str::to_string)
            .collect();
    }

    let mut builder = ChunkBuilder::new(max_len);

    for sentence in sentences(text) {
        let len = char_len(sentence);

        if builder.fits(len) {
            builder.append(sentence, len);
            continue;
        }

        builder.flush();
        if len <= max_len {
            builder.append(sentence, len);
        } else {
            builder.append_words(sentence);
        }
    }

    builder.finish()
}

/// Greedy accumulator for chunk text.
struct ChunkBuilder {
    max_len: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl ChunkBuilder {
    fn new(max_len: usize) -> Self {
        Self {
            max_len,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// A space is inserted when the running chunk ends mid-sentence, which
    /// happens after an overlong sentence was split into words.
    fn separator_len(&self) -> usize {
        match self.current.chars().last() {
            Some(c) if !c.is_whitespace() => 1,
            _ => 0,
        }
    }

    fn fits(&self, len: usize) -> bool {
        self.current_len + self.separator_len() + len <= self.max_len
    }

    fn append(&mut self, piece: &str, len: usize) {
        if self.separator_len() == 1 {
            self.current.push(' ');
            self.current_len += 1;
        }
        self.current.push_str(piece);
        self.current_len += len;
    }

    fn append_words(&mut self, sentence: &str) {
        for word in sentence.split_whitespace() {
            let len = char_len(word);

            if len > self.max_len {
                self.flush();
                let pieces = hard_split(word, self.max_len);
                let last = pieces.len() - 1;
                for (i, piece) in pieces.into_iter().enumerate() {
                    if i < last {
                        self.chunks.push(piece.to_string());
                    } else {
                        self.append(piece, char_len(piece));
                    }
                }
                continue;
            }

            if !self.fits(len) {
                self.flush();
            }
            self.append(word, len);
        }
    }

    fn flush(&mut self) {
        let trimmed = self.current.trim();
        if !trimmed.is_empty() {
            self.chunks.push(trimmed.to_string());
        }
        self.current.clear();
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn numbered_sentences(count: usize) -> String {
        (0..count)
            .map(|i| format!("This is sentence number {} of the transcript. ", i))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Hello world.", 4000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello world.");
        assert_eq!(chunks[0].framed(), "Hello world.");
    }

    #[test]
    fn test_text_exactly_at_limit_single_chunk() {
        let text = "a".repeat(100);
        assert_eq!(chunk_text(&text, 100).len(), 1);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn test_whitespace_text_still_chunked() {
        let chunks = chunk_text("   ", 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "   ");

        let chunks = split_text(" \n   \t ", 3);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(char_len(chunk) <= 3);
        }
    }

    #[test]
    fn test_framed_chunks_fit_limit() {
        let text = numbered_sentences(200);
        for max_len in [60, 100, 4000] {
            let chunks = chunk_framed(&text, max_len);
            assert!(chunks.len() > 1);
            for chunk in &chunks {
                assert!(
                    char_len(&chunk.framed()) <= max_len,
                    "framed part of {} chars exceeds {}",
                    char_len(&chunk.framed()),
                    max_len
                );
            }
            let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
            assert_eq!(strip_ws(&rebuilt), strip_ws(&text));
        }
    }

    #[test]
    fn test_framed_single_chunk_uses_whole_limit() {
        let text = "a".repeat(100);
        let chunks = chunk_framed(&text, 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].framed(), text);
    }

    #[test]
    fn test_9000_chars_into_4000_limit() {
        let mut text = numbered_sentences(200);
        while char_len(&text) < 9000 {
            text.push_str(" Another closing sentence.");
        }
        text.truncate(9000);
        assert_eq!(char_len(&text), 9000);

        let chunks = chunk_text(&text, 4000);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(char_len(&chunk.content) <= 4000);
            assert_eq!(chunk.total, chunks.len());
        }
        // Every chunk but the last closes on a sentence terminator.
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.content.ends_with('.'), "{:?}", chunk.content);
        }
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(strip_ws(&rebuilt), strip_ws(&text));
    }

    #[test]
    fn test_size_bound_and_coverage_across_limits() {
        let text = format!(
            "{} {} {}",
            numbered_sentences(40),
            "word ".repeat(300).trim_end(),
            "Short one! Is it? Yes."
        );

        for max_len in [1, 7, 30, 45, 100, 333, 1000, 5000] {
            let chunks = chunk_text(&text, max_len);
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(!chunk.content.is_empty());
                assert!(
                    char_len(&chunk.content) <= max_len,
                    "chunk of {} chars exceeds {}",
                    char_len(&chunk.content),
                    max_len
                );
            }
            let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
            assert_eq!(strip_ws(&rebuilt), strip_ws(&text), "max_len {}", max_len);
        }
    }

    #[test]
    fn test_sentences_kept_whole_when_they_fit() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = split_text(text, 45);
        assert_eq!(
            chunks,
            vec![
                "First sentence here. Second sentence here.",
                "Third sentence here."
            ]
        );
    }

    #[test]
    fn test_overlong_sentence_split_on_words() {
        let text = "alpha beta gamma delta epsilon zeta eta theta. Done.";
        let chunks = split_text(text, 12);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 12);
            // No word was cut in half.
            for word in chunk.split_whitespace() {
                assert!(text.contains(word));
            }
        }
        assert_eq!(chunks.first().map(String::as_str), Some("alpha beta"));
        assert_eq!(chunks.last().map(String::as_str), Some("Done."));
    }

    #[test]
    fn test_words_after_split_sentence_are_separated() {
        let text = "aaaa bbbb cccc dddd. Next.";
        let chunks = split_text(text, 15);
        assert!(chunks.iter().all(|c| !c.contains("dddd.Next")));
    }

    #[test]
    fn test_overlong_word_hard_split() {
        let url = format!("https://example.com/{}", "x".repeat(50));
        let chunks = split_text(&format!("See {} now.", url), 20);
        assert!(chunks.iter().all(|c| char_len(c) <= 20));
        let rebuilt: String = chunks.concat();
        assert!(strip_ws(&rebuilt).contains(&url));
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let text = "Čaute, ako sa máte? Ďakujem, výborne. Žiadny problém!";
        let chunks = split_text(text, 20);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 20);
        }
        assert_eq!(strip_ws(&chunks.concat()), strip_ws(text));
    }

    #[test]
    fn test_labels() {
        let chunks = chunk_text(&numbered_sentences(10), 100);
        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].label(), format!("Part 1/{}", chunks.len()));
        assert!(chunks[0].framed().starts_with("Part 1/"));
        assert!(chunks.last().unwrap().is_last());
        assert!(!chunks[0].is_last());
    }
}
