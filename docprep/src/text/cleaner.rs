//! General text cleaning shared by chunking and speech formatting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Any run of whitespace, including newlines and form feeds.
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Page markers inserted by PDF extractors, e.g. `[PAGE 12]`.
static PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[PAGE \d+\]").expect("page marker regex should compile"));

/// Clean extracted document text.
///
/// This function:
/// - Collapses every whitespace run (newlines and form feeds included) to one space
/// - Removes `[PAGE n]` markers
/// - Trims both ends
///
/// The result is a fixed point: cleaning it again returns it unchanged.
pub fn clean_text(text: &str) -> String {
    let mut result = collapse_whitespace(text);

    // Removing a marker can join spaces, or reveal a marker split by a nested one
    while PAGE_MARKER.is_match(&result) {
        let stripped = PAGE_MARKER.replace_all(&result, "");
        result = collapse_whitespace(&stripped);
    }

    result
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
