//! Error types for assetpath

use std::path::PathBuf;
use thiserror::Error;

/// Syntax errors raised while parsing an `asset:` identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognized scheme in '{0}': expected 'asset:'")]
    UnrecognizedScheme(String),

    #[error("Asset identifier has an empty name")]
    EmptyName,

    #[error("Invalid asset name '{0}': names may not contain path separators")]
    InvalidName(String),

    #[error("Malformed query '{0}': expected 'v=<version>'")]
    MalformedQuery(String),

    #[error("Unsupported query key '{0}'")]
    UnsupportedQueryKey(String),
}

/// The main error type for assetpath operations
#[derive(Debug, Error)]
pub enum AssetPathError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Corrupt manifest {}: {reason}", path.display())]
    ManifestCorrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Stage error: {0}")]
    StageError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),
}

/// Result type alias for assetpath operations
pub type Result<T> = std::result::Result<T, AssetPathError>;

impl From<toml::de::Error> for AssetPathError {
    fn from(err: toml::de::Error) -> Self {
        AssetPathError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for AssetPathError {
    fn from(err: toml::ser::Error) -> Self {
        AssetPathError::TomlSerError(err.to_string())
    }
}

impl From<serde_json::Error> for AssetPathError {
    fn from(err: serde_json::Error) -> Self {
        AssetPathError::JsonError(err.to_string())
    }
}
