//! Tokenizer implementations

mod command;
pub mod mock;
mod syllable;

pub use command::CommandTokenizer;
pub use mock::MockTokenizer;
pub use syllable::{SyllableSplitter, SyllableTokenizer};

use crate::config::TokenizerConfig;
use crate::error::{Result, TokenizerError};
use crate::tokenizer::WordTokenizer;

/// Supported tokenizer types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    Syllable,
    Command,
}

impl TokenizerKind {
    /// Parse tokenizer kind from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "syllable" | "syllables" | "builtin" => Ok(Self::Syllable),
            "command" | "cmd" | "external" => Ok(Self::Command),
            _ => Err(TokenizerError::ConfigError(format!(
                "Unknown tokenizer: {}",
                s
            ))),
        }
    }
}

/// Create a tokenizer instance from configuration
pub fn get_tokenizer(config: &TokenizerConfig) -> Result<Box<dyn WordTokenizer>> {
    let kind = TokenizerKind::parse(&config.kind)?;

    match kind {
        TokenizerKind::Syllable => Ok(Box::new(SyllableTokenizer::new())),
        TokenizerKind::Command => {
            let program = config.program.as_deref().ok_or_else(|| {
                TokenizerError::ConfigError(
                    "Command tokenizer requires a 'program' setting".into(),
                )
            })?;
            let tokenizer = CommandTokenizer::new(program, config.args.clone())?;
            tokenizer.is_available()?;
            Ok(Box::new(tokenizer))
        }
    }
}
