//! Straight-line preparation pipeline: pages -> references removed ->
//! flattened text -> chunks, plus speech output for a finished summary.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::text::chunker::ChunkSplitter;
use crate::text::cleaner::clean_text;
use crate::text::filename::sanitize_filename;
use crate::text::references::{BlockSequence, PageBlock, ReferenceStripper};
use crate::text::Chunk;
use crate::text::speech::SpeechNormalizer;

/// Separator placed between pages when they are flattened.
const PAGE_SEPARATOR: &str = "\n\n";

/// How the prepared text is submitted to the summarizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStrategy {
    /// The whole cleaned document as a single submission
    Stuff,
    /// Overlapping chunks summarized independently, then combined
    #[default]
    MapReduce,
}

/// Text ready for the summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedDocument {
    pub strategy: SummaryStrategy,
    pub chunks: Vec<Chunk>,
    pub references_removed: bool,
    /// Pages received
    pub pages_in: usize,
    /// Pages left after reference removal
    pub pages_kept: usize,
    /// Length of the cleaned text in characters
    pub cleaned_chars: usize,
}

/// Text ready for the TTS engine, with the stem to name its audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechOutput {
    pub text: String,
    pub slug: String,
}

/// The three preparation components, built once from a configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stripper: ReferenceStripper,
    splitter: ChunkSplitter,
    normalizer: SpeechNormalizer,
}

impl Pipeline {
    /// Build the components, rejecting invalid chunking parameters.
    pub fn new(config: &PrepConfig) -> Result<Self> {
        Ok(Self {
            stripper: ReferenceStripper::new(config.reference_patterns.as_slice())?,
            splitter: ChunkSplitter::new(config.chunk_size, config.overlap)?,
            normalizer: SpeechNormalizer::new(&config.abbreviations, &config.symbols)?,
        })
    }

    /// Prepare extracted pages for summarization.
    pub fn prepare(
        &self,
        blocks: BlockSequence,
        strategy: SummaryStrategy,
        remove_references: bool,
    ) -> PreparedDocument {
        let pages_in = blocks.len();

        let (blocks, references_removed) = if remove_references {
            let outcome = self.stripper.strip(blocks);
            (outcome.blocks, outcome.found)
        } else {
            (blocks, false)
        };
        let pages_kept = blocks.len();

        let cleaned = clean_text(&flatten(&blocks));
        let cleaned_chars = cleaned.chars().count();

        let chunks = match strategy {
            SummaryStrategy::Stuff if cleaned.is_empty() => Vec::new(),
            SummaryStrategy::Stuff => vec![Chunk {
                index: 0,
                start_offset: 0,
                end_offset: cleaned_chars,
                text: cleaned,
            }],
            SummaryStrategy::MapReduce => self.splitter.chunks(&cleaned).collect(),
        };

        info!(
            "Prepared {} of {} page(s) into {} chunk(s) ({:?})",
            pages_kept,
            pages_in,
            chunks.len(),
            strategy
        );

        PreparedDocument {
            strategy,
            chunks,
            references_removed,
            pages_in,
            pages_kept,
            cleaned_chars,
        }
    }

    /// Normalize text for speech and derive its artifact slug.
    pub fn speech(&self, text: &str) -> SpeechOutput {
        let formatted = self.normalizer.format(text);
        debug!(
            "Formatted {} chars for speech ({} after)",
            text.chars().count(),
            formatted.chars().count()
        );

        SpeechOutput {
            text: formatted,
            slug: sanitize_filename(text),
        }
    }
}

/// Join pages into one text, in order.
pub fn flatten(blocks: &[PageBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.content.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Decode one page of extractor output.
pub fn decode_page(bytes: Vec<u8>, source_name: &str) -> Result<PageBlock> {
    String::from_utf8(bytes)
        .map(PageBlock::new)
        .map_err(|_| PrepError::InvalidEncoding {
            source_name: source_name.to_string(),
        })
}

/// Split a text dump whose pages are separated by form feeds.
///
/// A trailing form feed does not produce an empty last page.
pub fn split_pages(text: &str) -> BlockSequence {
    let mut pages: Vec<&str> = text.split('\x0c').collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages.into_iter().map(PageBlock::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(contents: &[&str]) -> BlockSequence {
        contents.iter().map(|c| PageBlock::new(*c)).collect()
    }

    #[test]
    fn test_prepare_stuff_removes_references() {
        let pipeline = Pipeline::new(&PrepConfig::default()).unwrap();
        let doc = pipeline.prepare(
            pages(&["Intro text.", "Results here.\nReferences\n[1] A. Author"]),
            SummaryStrategy::Stuff,
            true,
        );
        assert!(doc.references_removed);
        assert_eq!(doc.pages_in, 2);
        assert_eq!(doc.pages_kept, 2);
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].text, "Intro text. Results here.");
        assert_eq!(doc.cleaned_chars, 25);
    }

    #[test]
    fn test_prepare_keeps_references_when_asked() {
        let pipeline = Pipeline::new(&PrepConfig::default()).unwrap();
        let doc = pipeline.prepare(
            pages(&["Body.", "References\n[1] A"]),
            SummaryStrategy::Stuff,
            false,
        );
        assert!(!doc.references_removed);
        assert_eq!(doc.chunks[0].text, "Body. References [1] A");
    }

    #[test]
    fn test_prepare_map_reduce_chunks() {
        let config = PrepConfig {
            chunk_size: 100,
            overlap: 20,
            ..PrepConfig::default()
        };
        let pipeline = Pipeline::new(&config).unwrap();
        let body = "word ".repeat(100);
        let doc = pipeline.prepare(
            pages(&[body.as_str(), body.as_str()]),
            SummaryStrategy::MapReduce,
            true,
        );
        assert!(doc.chunks.len() > 1);
        assert!(!doc.references_removed);
        assert_eq!(doc.chunks.last().unwrap().end_offset, doc.cleaned_chars);
    }

    #[test]
    fn test_prepare_empty_document() {
        let pipeline = Pipeline::new(&PrepConfig::default()).unwrap();
        let doc = pipeline.prepare(Vec::new(), SummaryStrategy::Stuff, true);
        assert!(doc.chunks.is_empty());
        assert_eq!(doc.cleaned_chars, 0);
    }

    #[test]
    fn test_prepared_document_serializes() {
        let pipeline = Pipeline::new(&PrepConfig::default()).unwrap();
        let doc = pipeline.prepare(pages(&["Short."]), SummaryStrategy::MapReduce, true);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["strategy"], "map-reduce");
        assert_eq!(json["chunks"][0]["text"], "Short.");
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let config = PrepConfig {
            chunk_size: 10,
            overlap: 10,
            ..PrepConfig::default()
        };
        assert!(matches!(
            Pipeline::new(&config),
            Err(PrepError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_speech_output() {
        let pipeline = Pipeline::new(&PrepConfig::default()).unwrap();
        let out = pipeline.speech("Dr. Silva: 50% done");
        assert_eq!(out.text, "Doutor Silva: 50 por cento done");
        assert_eq!(out.slug, "Dr._Silva_50%_done");
    }

    #[test]
    fn test_decode_page_rejects_invalid_utf8() {
        let err = decode_page(vec![0x66, 0xff, 0xfe], "page-1.txt").unwrap_err();
        assert!(matches!(
            err,
            PrepError::InvalidEncoding { ref source_name } if source_name == "page-1.txt"
        ));
    }

    #[test]
    fn test_decode_page_accepts_utf8() {
        let page = decode_page("Referências".as_bytes().to_vec(), "p").unwrap();
        assert_eq!(page.content, "Referências");
    }

    #[test]
    fn test_split_pages() {
        let blocks = split_pages("one\x0ctwo\x0cthree\x0c");
        assert_eq!(blocks, pages(&["one", "two", "three"]));
        assert_eq!(split_pages("single"), pages(&["single"]));
    }

    #[test]
    fn test_flatten() {
        assert_eq!(flatten(&pages(&["a", "b"])), "a\n\nb");
        assert_eq!(flatten(&[]), "");
    }
}
