//! Text processing: cleaning, reference stripping, chunking and speech formatting.

pub mod chunker;
pub mod cleaner;
pub mod filename;
pub mod keywords;
pub mod references;
pub mod speech;

pub use chunker::{Chunk, ChunkSplitter, Chunks, split_into_chunks};
pub use cleaner::clean_text;
pub use filename::{artifact_stem, sanitize_filename, summary_file_name};
pub use keywords::extract_keywords;
pub use references::{BlockSequence, PageBlock, ReferenceStripper, StripOutcome};
pub use speech::{Rule, SpeechNormalizer, format_for_tts};
