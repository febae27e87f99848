//! Speech normalization: abbreviation and symbol verbalization for TTS.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::cleaner::clean_text;
use crate::error::Result;

/// Abbreviations and their spoken forms, applied in order.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Dr.", "Doutor"),
    ("Sr.", "Senhor"),
    ("Sra.", "Senhora"),
    ("Prof.", "Professor"),
    ("Eng.", "Engenheiro"),
    ("e.g.", "por exemplo"),
    ("i.e.", "isto é"),
    ("etc.", "etcetera"),
    ("pg.", "página"),
    ("cap.", "capítulo"),
    ("fig.", "figura"),
    ("Eq.", "Equação"),
];

/// Symbols and their spoken forms, applied in order as literal replacements.
pub const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("%", " por cento"),
    ("$", " dólares"),
    ("€", " euros"),
    ("£", " libras"),
    ("+", " mais"),
    ("=", " igual a"),
    (">", " maior que"),
    ("<", " menor que"),
    ("&", " e"),
    ("@", " arroba"),
    ("#", " hashtag"),
    ("°C", " graus Celsius"),
    ("°F", " graus Fahrenheit"),
    ("/", " barra "),
    ("\\", " barra invertida "),
];

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)(?:st|nd|rd|th)\b").expect("ordinal regex should compile"));

/// Signs that are spoken after their amount when the symbol table verbalizes them.
const CURRENCY_SIGNS: &[&str] = &["$", "€", "£"];

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+").expect("list marker regex should compile"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line regex should compile"));

/// A match pattern and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Build an owned rule list from a static table.
pub fn rules_from(table: &[(&str, &str)]) -> Vec<Rule> {
    table.iter().map(|(p, r)| Rule::new(*p, *r)).collect()
}

/// Rewrites prose into text a TTS engine reads naturally.
#[derive(Debug, Clone)]
pub struct SpeechNormalizer {
    /// Word-boundary anchored abbreviation matchers with their expansions
    abbreviations: Vec<(Regex, String)>,
    /// `$10` or `€3,50`, for the currency signs present in `symbols`
    prefix_currency: Option<Regex>,
    symbols: Vec<Rule>,
}

/// Anchor an abbreviation at the start of a word.
///
/// A pattern opening with a word character gets `\b`. Any other pattern
/// must follow the text start or a non-word character, captured as `lead`.
fn abbreviation_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern);
    let starts_word = pattern
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');

    let re = if starts_word {
        Regex::new(&format!(r"\b{}", escaped))?
    } else {
        Regex::new(&format!(r"(?P<lead>^|\W){}", escaped))?
    };
    Ok(re)
}

/// Match a currency sign directly before its amount.
///
/// A sign glued to a preceding letter (`R$10`, `US$5`) is part of another
/// currency and is left alone.
fn prefix_currency_regex(symbols: &[Rule]) -> Result<Option<Regex>> {
    let signs: Vec<String> = CURRENCY_SIGNS
        .iter()
        .filter(|sign| symbols.iter().any(|rule| rule.pattern == **sign))
        .map(|sign| regex::escape(sign))
        .collect();

    if signs.is_empty() {
        return Ok(None);
    }

    let re = Regex::new(&format!(
        r"(?P<lead>^|[^\p{{L}}])(?P<sign>{})(?P<amount>\d+(?:[.,]\d+)*)",
        signs.join("|")
    ))?;
    Ok(Some(re))
}

impl Default for SpeechNormalizer {
    fn default() -> Self {
        Self::new(
            &rules_from(DEFAULT_ABBREVIATIONS),
            &rules_from(DEFAULT_SYMBOLS),
        )
        .expect("default speech tables should compile")
    }
}

impl SpeechNormalizer {
    /// Create a normalizer from ordered abbreviation and symbol tables.
    ///
    /// Abbreviations match case-sensitively at a word start. Symbols are
    /// plain substrings. Amounts are only moved before a currency sign
    /// that the symbol table verbalizes.
    pub fn new(abbreviations: &[Rule], symbols: &[Rule]) -> Result<Self> {
        let abbreviations = abbreviations
            .iter()
            .filter(|rule| !rule.pattern.is_empty())
            .map(|rule| {
                let re = abbreviation_regex(&rule.pattern)?;
                Ok((re, rule.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let symbols: Vec<Rule> = symbols
            .iter()
            .filter(|rule| !rule.pattern.is_empty())
            .cloned()
            .collect();

        Ok(Self {
            abbreviations,
            prefix_currency: prefix_currency_regex(&symbols)?,
            symbols,
        })
    }

    /// Format text for speech synthesis.
    ///
    /// Steps, in order:
    /// 1. General cleaning
    /// 2. Abbreviation expansion
    /// 3. Ordinal suffix removal (`1st` -> `1`)
    /// 4. Currency amounts moved before their sign (`$10` -> `10$`)
    /// 5. Symbol verbalization
    /// 6. Leading list markers removed
    /// 7. Blank-line runs collapsed to one blank line
    pub fn format(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut formatted = clean_text(text);

        for (re, replacement) in &self.abbreviations {
            formatted = re
                .replace_all(&formatted, |caps: &Captures| {
                    let lead = caps.name("lead").map_or("", |m| m.as_str());
                    format!("{}{}", lead, replacement)
                })
                .into_owned();
        }

        formatted = ORDINAL.replace_all(&formatted, "$1").into_owned();
        if let Some(re) = &self.prefix_currency {
            formatted = re
                .replace_all(&formatted, "${lead}${amount}${sign}")
                .into_owned();
        }

        for rule in &self.symbols {
            formatted = formatted.replace(&rule.pattern, &rule.replacement);
        }

        formatted = LIST_MARKER.replace_all(&formatted, "").into_owned();
        BLANK_LINES.replace_all(&formatted, "\n\n").into_owned()
    }
}

/// Format text for speech synthesis with the default tables.
pub fn format_for_tts(text: &str) -> String {
    static DEFAULT: Lazy<SpeechNormalizer> = Lazy::new(SpeechNormalizer::default);
    DEFAULT.format(text)
}
