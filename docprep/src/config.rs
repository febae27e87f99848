//! Document preparation configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{PrepError, Result};
use crate::pipeline::SummaryStrategy;
use crate::text::chunker::{ChunkSplitter, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::text::references::DEFAULT_REFERENCE_PATTERNS;
use crate::text::speech::{DEFAULT_ABBREVIATIONS, DEFAULT_SYMBOLS, Rule, rules_from};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters repeated between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// How chunks are submitted to the summarizer
    #[serde(default)]
    pub strategy: SummaryStrategy,

    /// Headings that open a references section
    #[serde(default = "default_reference_patterns")]
    pub reference_patterns: Vec<String>,

    /// Ordered abbreviation expansions for speech
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<Rule>,

    /// Ordered symbol verbalizations for speech
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Rule>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_overlap() -> usize {
    DEFAULT_OVERLAP
}

fn default_reference_patterns() -> Vec<String> {
    DEFAULT_REFERENCE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_abbreviations() -> Vec<Rule> {
    rules_from(DEFAULT_ABBREVIATIONS)
}

fn default_symbols() -> Vec<Rule> {
    rules_from(DEFAULT_SYMBOLS)
}

fn config_path_under(home: Option<&str>) -> Result<PathBuf> {
    let home = home.ok_or(PrepError::HomeNotFound)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("paper-podcast")
        .join("config.toml"))
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            strategy: SummaryStrategy::default(),
            reference_patterns: default_reference_patterns(),
            abbreviations: default_abbreviations(),
            symbols: default_symbols(),
        }
    }
}

impl PrepConfig {
    /// Get the config file path: ~/.config/paper-podcast/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok();
        config_path_under(home.as_deref())
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: PrepConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the config as it is stored on disk
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the chunking parameters.
    pub fn validate(&self) -> Result<()> {
        ChunkSplitter::new(self.chunk_size, self.overlap).map(|_| ())
    }
}
