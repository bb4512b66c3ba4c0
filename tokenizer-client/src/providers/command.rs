//! External command tokenizer
//!
//! Runs a tokenizer program as a subprocess: the chunk text is written to its
//! stdin and a JSON array of token records is read back from stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Result, TokenizerError};
use crate::token::TokenRecord;
use crate::tokenizer::WordTokenizer;

/// Tokenizer backed by an external program
#[derive(Debug, Clone)]
pub struct CommandTokenizer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTokenizer {
    /// Create a new command tokenizer
    ///
    /// Returns an error if the program cannot be found.
    pub fn new(program: &str, args: Vec<String>) -> Result<Self> {
        let candidate = PathBuf::from(program);
        let program = if candidate.components().count() > 1 {
            if !candidate.exists() {
                return Err(TokenizerError::ProviderUnavailable(format!(
                    "Tokenizer program not found at specified path: {}",
                    candidate.display()
                )));
            }
            candidate
        } else {
            which::which(program).map_err(|_| {
                TokenizerError::ProviderUnavailable(format!(
                    "Tokenizer program '{}' not found in PATH",
                    program
                ))
            })?
        };

        Ok(Self { program, args })
    }
}

impl WordTokenizer for CommandTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenRecord>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TokenizerError::CommandFailed {
                message: format!("Failed to execute {}: {}", self.program.display(), e),
                status: None,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TokenizerError::CommandFailed {
                message: stderr.trim().to_string(),
                status: output.status.code(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| TokenizerError::InvalidOutput(format!("Invalid UTF-8: {}", e)))?;

        let tokens: Vec<TokenRecord> = serde_json::from_str(stdout.trim())?;
        log::debug!(
            "{} returned {} tokens",
            self.program.display(),
            tokens.len()
        );
        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "command"
    }

    fn is_available(&self) -> Result<()> {
        // Availability was checked in constructor
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_in_path() {
        let result = CommandTokenizer::new("definitely-not-a-tokenizer-binary", vec![]);
        assert!(matches!(
            result,
            Err(TokenizerError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_program_path() {
        let result = CommandTokenizer::new("/nonexistent/dir/tokenize", vec![]);
        assert!(matches!(
            result,
            Err(TokenizerError::ProviderUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_tokenize_via_shell() {
        let script = r#"cat > /dev/null; printf '[{"text":"ཀ་","chunk_type":"TEXT","pos":"NOUN"},{"text":"།","chunk_type":"PUNCT"}]'"#;
        let tokenizer =
            CommandTokenizer::new("sh", vec!["-c".to_string(), script.to_string()]).unwrap();
        let tokens = tokenizer.tokenize("ཀ།").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].pos.as_deref(), Some("NOUN"));
    }

    #[cfg(unix)]
    #[test]
    fn test_tokenize_reports_failure() {
        let tokenizer = CommandTokenizer::new(
            "sh",
            vec!["-c".to_string(), "cat > /dev/null; echo boom >&2; exit 3".to_string()],
        )
        .unwrap();
        match tokenizer.tokenize("ཀ") {
            Err(TokenizerError::CommandFailed { message, status }) => {
                assert_eq!(message, "boom");
                assert_eq!(status, Some(3));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tokenize_rejects_bad_json() {
        let tokenizer = CommandTokenizer::new(
            "sh",
            vec!["-c".to_string(), "cat > /dev/null; echo not-json".to_string()],
        )
        .unwrap();
        assert!(matches!(
            tokenizer.tokenize("ཀ"),
            Err(TokenizerError::Json(_))
        ));
    }
}
