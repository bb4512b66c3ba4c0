use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] tokenizer_client::TokenizerError),
}

impl SegmentError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Wrap a YAML error with the artifact it came from.
    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    /// True for errors the operator must fix before re-running.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Yaml { .. } | Self::TomlParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SegmentError>;
