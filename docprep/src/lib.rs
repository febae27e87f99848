//! Document preparation for summarization and text-to-speech
//!
//! Turns extracted page text into:
//! - A page sequence with the trailing references section removed
//! - Overlapping chunks cut at natural breaks, for a summarizer
//! - Speech-safe text and a filename slug, for a TTS engine
//!
//! Every transform is a pure function of its input and configuration.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod text;

pub use config::PrepConfig;
pub use error::{PrepError, Result};
pub use pipeline::{
    Pipeline, PreparedDocument, SpeechOutput, SummaryStrategy, decode_page, flatten, split_pages,
};
pub use text::{
    BlockSequence, Chunk, ChunkSplitter, PageBlock, ReferenceStripper, Rule, SpeechNormalizer,
    StripOutcome, clean_text, extract_keywords, format_for_tts, sanitize_filename,
    split_into_chunks,
};
