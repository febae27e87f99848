//! Removal of the trailing references/bibliography section.

use log::{debug, info};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Headings that open a references section by default.
pub const DEFAULT_REFERENCE_PATTERNS: &[&str] = &["references", "referências"];

/// One page of extracted document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBlock {
    pub content: String,
}

impl PageBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Pages in document order.
pub type BlockSequence = Vec<PageBlock>;

/// Result of stripping references from a block sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    pub blocks: BlockSequence,
    /// Whether a references heading was found
    pub found: bool,
}

/// Truncates a block sequence at the first references heading.
#[derive(Debug, Clone)]
pub struct ReferenceStripper {
    /// None when the heading set is empty
    heading: Option<Regex>,
}

impl Default for ReferenceStripper {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_PATTERNS)
            .expect("default reference patterns should compile")
    }
}

impl ReferenceStripper {
    /// Build a stripper from literal heading strings.
    ///
    /// Headings match case-insensitively when they make up a whole line
    /// (trailing spaces, tabs and a carriage return are allowed).
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { heading: None });
        }

        let heading = RegexBuilder::new(&format!(
            r"^(?:{})[ \t]*\r?$",
            alternatives.join("|")
        ))
        .case_insensitive(true)
        .multi_line(true)
        .build()?;

        Ok(Self {
            heading: Some(heading),
        })
    }

    /// Byte offset of the first heading in `content`, if any.
    pub fn find_heading(&self, content: &str) -> Option<usize> {
        self.heading
            .as_ref()
            .and_then(|re| re.find(content))
            .map(|m| m.start())
    }

    /// Drop everything from the first references heading onward.
    ///
    /// Text before the heading on the matching page is kept (trimmed);
    /// a page that opens with the heading is dropped entirely. Pages
    /// before it are returned untouched. Without a heading the input
    /// comes back unchanged.
    pub fn strip(&self, blocks: BlockSequence) -> StripOutcome {
        let Some(page) = blocks
            .iter()
            .position(|block| self.find_heading(&block.content).is_some())
        else {
            debug!("No references heading in {} page(s)", blocks.len());
            return StripOutcome {
                blocks,
                found: false,
            };
        };

        let mut blocks = blocks;
        blocks.truncate(page + 1);

        let mut last = blocks.pop().map(|block| block.content).unwrap_or_default();
        if let Some(offset) = self.find_heading(&last) {
            if offset > 0 {
                last.truncate(offset);
                blocks.push(PageBlock::new(last.trim()));
            }
        }

        info!(
            "References start on page {}, keeping {} page(s)",
            page + 1,
            blocks.len()
        );

        StripOutcome {
            blocks,
            found: true,
        }
    }
}
