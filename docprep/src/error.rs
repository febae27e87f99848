use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Home directory not found: set HOME or USERPROFILE")]
    HomeNotFound,

    #[error("Input is not valid UTF-8: {source_name}")]
    InvalidEncoding { source_name: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PrepError>;
