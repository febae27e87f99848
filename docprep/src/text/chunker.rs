//! Overlapping chunking for summarizer submission.

use log::debug;
use serde::Serialize;

use super::cleaner::clean_text;
use crate::error::{PrepError, Result};

/// Default target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_OVERLAP: usize = 200;

/// Half-width of the window searched for a sentence end around a cut.
const SENTENCE_WINDOW: usize = 50;

/// Half-width of the window searched for a line break around a cut.
const NEWLINE_WINDOW: usize = 30;

/// A contiguous slice of the cleaned text.
///
/// Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position of this chunk in the sequence
    pub index: usize,
    /// First character of the chunk (inclusive)
    pub start_offset: usize,
    /// One past the last character of the chunk
    pub end_offset: usize,
    /// The chunk text
    pub text: String,
}

impl Chunk {
    /// Length of the chunk in characters.
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

/// Splits text into bounded, overlapping chunks cut at natural breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkSplitter {
    /// Create a splitter, rejecting a zero chunk size or an overlap that
    /// is not smaller than the chunk size.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PrepError::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(PrepError::InvalidConfiguration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Clean `text` and split it into chunks.
    ///
    /// Text that cleans down to nothing yields no chunks. Any other text no
    /// longer than `chunk_size` comes back as a single chunk.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let cleaned = clean_text(text);
        let chunks: Vec<Chunk> = self.chunks(&cleaned).collect();

        debug!(
            "Split {} chars into {} chunk(s) (size {}, overlap {})",
            cleaned.chars().count(),
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        chunks
    }

    /// Iterate over the chunks of text that has already been cleaned.
    ///
    /// No cleaning is applied, so line breaks in `cleaned` take part in
    /// the natural-break search. The iterator can be cloned to restart
    /// from its current position.
    pub fn chunks<'a>(&self, cleaned: &'a str) -> Chunks<'a> {
        Chunks {
            text: cleaned,
            chars: cleaned.char_indices().collect(),
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            start: 0,
            index: 0,
            done: self.chunk_size == 0 || cleaned.is_empty(),
        }
    }
}

/// Split text into overlapping chunks without validating the configuration.
///
/// A zero `chunk_size` yields no chunks. An `overlap` that is not smaller
/// than `chunk_size` is tolerated: the cursor still advances on every step.
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if chunk_size == 0 {
        return Vec::new();
    }

    ChunkSplitter {
        chunk_size,
        overlap,
    }
    .split(text)
}

/// Lazy iterator over the chunks of a cleaned text.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset and value of every character
    chars: Vec<(usize, char)>,
    chunk_size: usize,
    overlap: usize,
    start: usize,
    index: usize,
    done: bool,
}

impl Chunks<'_> {
    fn char_at(&self, pos: usize) -> char {
        self.chars[pos].1
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.text.len())
    }

    /// Character range `[end - half, end + half)`, never reaching before `start`.
    fn window(&self, start: usize, end: usize, half: usize) -> (usize, usize) {
        let lo = end.saturating_sub(half).max(start);
        let hi = (end + half).min(self.chars.len());
        (lo, hi)
    }

    /// Move a cut to a nearby sentence end or line break.
    ///
    /// Both windows are searched around the unadjusted `end`. A line break
    /// found in its window overrides a sentence end.
    fn natural_cut(&self, start: usize, end: usize) -> usize {
        let mut cut = end;

        let (lo, hi) = self.window(start, end, SENTENCE_WINDOW);
        if let Some(pos) = (lo..hi.saturating_sub(1))
            .find(|&i| self.char_at(i) == '.' && self.char_at(i + 1).is_whitespace())
        {
            cut = pos + 1;
        }

        let (lo, hi) = self.window(start, end, NEWLINE_WINDOW);
        if let Some(pos) = (lo..hi).find(|&i| self.char_at(i) == '\n') {
            cut = pos + 1;
        }

        cut
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }

        let len = self.chars.len();
        let start = self.start;

        // Text no longer than one chunk comes back whole on the first step
        let mut end = start + self.chunk_size;
        if end < len {
            end = self.natural_cut(start, end);
        }
        let end = end.min(len);

        let chunk = Chunk {
            index: self.index,
            start_offset: start,
            end_offset: end,
            text: self.text[self.byte_offset(start)..self.byte_offset(end)].to_string(),
        };
        self.index += 1;

        if end >= len {
            self.done = true;
        } else {
            let next = end.saturating_sub(self.overlap);
            self.start = if next > start { next } else { end };
        }

        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, overlap: usize) -> ChunkSplitter {
        ChunkSplitter::new(chunk_size, overlap).unwrap()
    }

    #[test]
    fn test_chunk_short_text() {
        let text = "Hello world. How are you?";
        let chunks = splitter(1000, 200).split(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world. How are you?");
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].end_offset, 25);
    }

    #[test]
    fn test_chunk_exact_size_is_single() {
        let text = "abcdefghij";
        let chunks = splitter(10, 2).split(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(splitter(1000, 200).split("").is_empty());
        assert!(splitter(1000, 200).split("  \n\n  ").is_empty());
    }

    #[test]
    fn test_chunk_text_is_cleaned() {
        let text = "one\n\n\ntwo [PAGE 3]   three";
        let chunks = splitter(100, 10).split(text);
        assert_eq!(chunks[0].text, "one two three");
    }

    #[test]
    fn test_hard_cut_without_breaks() {
        let chunks = splitter(4, 1).chunks("abcdefghij").collect::<Vec<_>>();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_overlap_invariant() {
        let text = "x".repeat(1000);
        let chunks = splitter(300, 50).split(&text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start_offset, pair[0].end_offset - 50);
        }
        assert_eq!(chunks.last().unwrap().end_offset, 1000);
    }

    #[test]
    fn test_cut_after_sentence_end() {
        // period at 80 followed by a space, no line breaks
        let text = format!("{}. {}", "a".repeat(80), "b".repeat(200));
        let chunks: Vec<Chunk> = splitter(100, 0).chunks(&text).collect();
        assert_eq!(chunks[0].end_offset, 81);
        assert!(chunks[0].text.ends_with('.'));
    }

    #[test]
    fn test_period_without_whitespace_is_not_a_break() {
        let text = format!("{}.{}", "a".repeat(80), "b".repeat(200));
        let chunks: Vec<Chunk> = splitter(100, 0).chunks(&text).collect();
        assert_eq!(chunks[0].end_offset, 100);
    }

    #[test]
    fn test_newline_overrides_sentence_end() {
        // period at 80 (sentence window [50, 150)), newline at 110 (newline window [70, 130))
        let text = format!(
            "{}. {}\n{}",
            "a".repeat(80),
            "b".repeat(28),
            "c".repeat(100)
        );
        let chunks: Vec<Chunk> = splitter(100, 0).chunks(&text).collect();
        assert_eq!(chunks[0].end_offset, 111);
        assert!(chunks[0].text.ends_with('\n'));
    }

    #[test]
    fn test_newline_outside_window_leaves_sentence_cut() {
        // newline at 140 lies outside [70, 130)
        let text = format!(
            "{}. {}\n{}",
            "a".repeat(80),
            "b".repeat(58),
            "c".repeat(100)
        );
        let chunks: Vec<Chunk> = splitter(100, 0).chunks(&text).collect();
        assert_eq!(chunks[0].end_offset, 81);
    }

    #[test]
    fn test_newline_before_sentence_end_still_wins() {
        // newline at 75, period at 90
        let text = format!(
            "{}\n{}. {}",
            "a".repeat(75),
            "b".repeat(14),
            "c".repeat(100)
        );
        let chunks: Vec<Chunk> = splitter(100, 0).chunks(&text).collect();
        assert_eq!(chunks[0].end_offset, 76);
    }

    #[test]
    fn test_window_does_not_reach_before_start() {
        // With a small chunk size the window would start before the cursor
        let text = "Hi. there and more words follow here";
        let chunks: Vec<Chunk> = splitter(10, 2).chunks(text).collect();
        for chunk in &chunks {
            assert!(chunk.end_offset > chunk.start_offset);
        }
        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }

    #[test]
    fn test_unicode_offsets_count_chars() {
        let text = "é".repeat(25);
        let chunks = splitter(10, 3).split(&text);
        assert_eq!(chunks[0].text.chars().count(), 10);
        assert_eq!(chunks[1].start_offset, 7);
        assert_eq!(chunks.last().unwrap().end_offset, 25);
    }

    #[test]
    fn test_chunk_indices_are_sequential() {
        let text = "word ".repeat(200);
        let chunks = splitter(100, 20).split(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.len(), chunk.text.chars().count());
        }
    }

    #[test]
    fn test_chunks_iterator_restarts_from_clone() {
        let text = "abcdefghijklmnop";
        let s = splitter(5, 1);
        let mut iter = s.chunks(text);
        iter.next();
        let saved = iter.clone();
        let rest: Vec<Chunk> = iter.collect();
        let replay: Vec<Chunk> = saved.collect();
        assert_eq!(rest, replay);
    }

    #[test]
    fn test_new_rejects_invalid_configuration() {
        assert!(matches!(
            ChunkSplitter::new(0, 0),
            Err(PrepError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ChunkSplitter::new(100, 100),
            Err(PrepError::InvalidConfiguration(_))
        ));
        assert!(ChunkSplitter::new(100, 99).is_ok());
    }

    #[test]
    fn test_permissive_zero_chunk_size() {
        assert!(split_into_chunks("some text here", 0, 0).is_empty());
    }

    #[test]
    fn test_permissive_large_overlap_still_progresses() {
        let chunks = split_into_chunks("abcdefghij", 3, 5);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "def", "ghi", "j"]);
    }

    #[test]
    fn test_default_splitter() {
        let s = ChunkSplitter::default();
        assert_eq!(s.chunk_size(), 1000);
        assert_eq!(s.overlap(), 200);
    }
}
