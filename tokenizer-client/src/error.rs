use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Tokenizer not available: {0}")]
    ProviderUnavailable(String),

    #[error("Tokenizer command failed{}: {message}", status.map(|c| format!(" (exit {})", c)).unwrap_or_default())]
    CommandFailed {
        message: String,
        status: Option<i32>,
    },

    #[error("Invalid tokenizer output: {0}")]
    InvalidOutput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
