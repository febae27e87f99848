//! Filesystem-safe names for generated artifacts.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum slug length in characters.
const MAX_SLUG_CHARS: usize = 50;

/// Characters of the source text used to name a podcast artifact.
const ARTIFACT_TEXT_CHARS: usize = 30;

/// Returned when nothing usable is left of the input.
pub const FALLBACK_NAME: &str = "unnamed";

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-]+").expect("separator regex should compile"));

/// Characters that are invalid in filenames on common filesystems, or
/// unsafe to pass through a shell.
fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' | '!'
    )
}

/// Convert arbitrary text into a safe filename stem (no extension).
///
/// Forbidden characters are dropped, whitespace and hyphen runs become a
/// single underscore, and the result is cut to 50 characters before
/// surrounding underscores are trimmed. Never returns an empty string.
pub fn sanitize_filename(text: &str) -> String {
    let kept: String = text.chars().filter(|c| !is_forbidden(*c)).collect();
    let joined = SEPARATOR_RUN.replace_all(&kept, "_");
    let truncated: String = joined.chars().take(MAX_SLUG_CHARS).collect();
    let trimmed = truncated.trim_matches('_');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stem for a podcast audio file: `podcast_<timestamp>_<slug>`.
///
/// The slug is derived from the first 30 characters of `text`.
pub fn artifact_stem(text: &str, timestamp: NaiveDateTime) -> String {
    let head: String = text.chars().take(ARTIFACT_TEXT_CHARS).collect();
    format!(
        "podcast_{}_{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        sanitize_filename(&head)
    )
}

/// File name for a stored summary of the document named `source_stem`.
pub fn summary_file_name(source_stem: &str) -> String {
    format!("{}_summary.json", sanitize_filename(source_stem))
}
