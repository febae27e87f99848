//! Frequency-based keyword extraction.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::cleaner::clean_text;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("word regex should compile"));

/// English and Portuguese function words that never count as keywords.
const STOPWORDS: &[&str] = &[
    // English
    "a", "an", "the", "and", "or", "but", "if", "because", "as", "what", "when", "where", "how",
    "which", "who", "whom", "this", "that", "these", "those", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "to", "at",
    "by", "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there",
    // Portuguese
    "o", "os", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das", "no", "na", "nos",
    "nas", "ao", "aos", "à", "às", "pelo", "pela", "pelos", "pelas", "em", "por", "para", "com",
    "sem", "como", "que", "quando", "onde", "qual", "quais", "quem", "cujo", "cuja", "cujos",
    "cujas", "este", "esta", "estes", "estas", "esse", "essa", "esses", "essas", "aquele",
    "aquela", "aqueles", "aquelas", "ser", "estar", "ter", "haver", "fazer",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Return up to `max_keywords` of the most frequent non-stopword words.
///
/// Only ASCII alphabetic words of three or more letters are considered.
/// Words are lowercased; equal counts keep first-appearance order.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    if text.is_empty() || max_keywords == 0 {
        return Vec::new();
    }

    let cleaned = clean_text(&text.to_lowercase());

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for word in WORD.find_iter(&cleaned).map(|m| m.as_str()) {
        if STOPWORD_SET.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among ties
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    order
        .into_iter()
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}
