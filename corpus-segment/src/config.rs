//! corpus-segment settings management.

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokenizer_client::TokenizerConfig;

/// Default chunk size in atomic units.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Tibetan tsheg, the syllable separator appended to every reviewed word.
pub const DEFAULT_MARKER: &str = "\u{0F0B}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Target chunk size in atomic units
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Separator character terminating every word in the review buffer
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Tokenizer data dialect (subdirectory of tok_data)
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Words whose lemma is never substituted even with an འ-affixation
    #[serde(default = "default_lemmatization_exceptions")]
    pub lemmatization_exceptions: Vec<String>,

    /// Word tokenizer backend
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_dialect() -> String {
    "general".to_string()
}

fn default_lemmatization_exceptions() -> Vec<String> {
    vec!["བཅས་".to_string(), "མཁས་".to_string()]
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            marker: default_marker(),
            dialect: default_dialect(),
            lemmatization_exceptions: default_lemmatization_exceptions(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl SegmentConfig {
    /// Get the default config file path: <config_dir>/cli-programs/corpus-segment.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cli-programs")
            .join("corpus-segment.toml")
    }

    /// Load config from a specific file, returning defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SegmentError::file(path, e))?;
        let config: SegmentConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SegmentError::file(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| SegmentError::file(path, e))?;
        Ok(())
    }

    /// The marker as a character (tsheg when the setting is empty).
    pub fn marker_char(&self) -> char {
        self.marker.chars().next().unwrap_or('\u{0F0B}')
    }

    /// Reject settings no step could run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(SegmentError::Config(
                "chunk_size must be a positive number of units".into(),
            ));
        }
        if self.marker.chars().count() != 1 {
            return Err(SegmentError::Config(format!(
                "marker must be a single character, got {:?}",
                self.marker
            )));
        }
        if self.dialect.trim().is_empty() {
            return Err(SegmentError::Config("dialect must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SegmentConfig::default();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.marker, "་");
        assert_eq!(config.dialect, "general");
        assert_eq!(config.lemmatization_exceptions, vec!["བཅས་", "མཁས་"]);
        assert_eq!(config.tokenizer.kind, "syllable");
    }

    #[test]
    fn test_config_path() {
        let path = SegmentConfig::config_path();
        assert!(path.ends_with("cli-programs/corpus-segment.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
chunk_size = 120
dialect = "classical"

[tokenizer]
kind = "command"
program = "botok-json"
args = ["--lemmas"]
"#;
        let config: SegmentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chunk_size, 120);
        assert_eq!(config.dialect, "classical");
        assert_eq!(config.marker, "་");
        assert_eq!(config.tokenizer.program.as_deref(), Some("botok-json"));
        assert_eq!(config.tokenizer.args, vec!["--lemmas"]);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: SegmentConfig = toml::from_str("").unwrap();
        assert_eq!(config, SegmentConfig::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = SegmentConfig::load_from(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(config, SegmentConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");
        let config = SegmentConfig {
            chunk_size: 42,
            ..SegmentConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(SegmentConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_marker_char() {
        assert_eq!(SegmentConfig::default().marker_char(), '་');
        let config = SegmentConfig {
            marker: "|".to_string(),
            ..SegmentConfig::default()
        };
        assert_eq!(config.marker_char(), '|');
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "chunk_size = 0\n").unwrap();
        let err = SegmentConfig::load_from(&path).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_multi_char_marker_rejected() {
        let config = SegmentConfig {
            marker: "ab".to_string(),
            ..SegmentConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
