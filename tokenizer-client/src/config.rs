use serde::{Deserialize, Serialize};

/// Which word tokenizer to use and how to launch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Tokenizer identifier (syllable, command)
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Program to run (for the command tokenizer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Extra arguments passed to the program
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

fn default_kind() -> String {
    "syllable".to_string()
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            program: None,
            args: Vec::new(),
        }
    }
}
