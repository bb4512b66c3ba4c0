//! Mock tokenizer for testing
//!
//! Provides a configurable tokenizer that can return fixed tokens, echo its
//! input back as tokens, or fail.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TokenizerError};
use crate::token::{ChunkType, TokenRecord};
use crate::tokenizer::WordTokenizer;

enum Behavior {
    Fixed(Vec<TokenRecord>),
    Echo,
    Fail(String),
}

/// A mock tokenizer that records every chunk it is asked to tokenize
pub struct MockTokenizer {
    behavior: Behavior,
    /// Current call count
    call_count: AtomicUsize,
    /// Inputs received, in call order
    inputs: Mutex<Vec<String>>,
}

impl MockTokenizer {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            call_count: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Create a tokenizer that always returns the given tokens
    pub fn always_returns(tokens: Vec<TokenRecord>) -> Self {
        Self::with_behavior(Behavior::Fixed(tokens))
    }

    /// Create a tokenizer that turns each whitespace-separated word into a TEXT token
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Create a tokenizer that always fails with the given message
    pub fn always_fails(message: &str) -> Self {
        Self::with_behavior(Behavior::Fail(message.to_string()))
    }

    /// Get the number of times tokenize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the inputs passed to tokenize(), in call order
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }
}

impl WordTokenizer for MockTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenRecord>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(text.to_string());
        }

        match &self.behavior {
            Behavior::Fixed(tokens) => Ok(tokens.clone()),
            Behavior::Echo => Ok(text
                .split_whitespace()
                .map(|word| TokenRecord::new(ChunkType::Text, word))
                .collect()),
            Behavior::Fail(message) => Err(TokenizerError::CommandFailed {
                message: message.clone(),
                status: None,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_returns() {
        let tokenizer =
            MockTokenizer::always_returns(vec![TokenRecord::new(ChunkType::Punct, "།")]);
        let tokens = tokenizer.tokenize("anything").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "།");
        assert_eq!(tokenizer.call_count(), 1);
    }

    #[test]
    fn test_echo_records_inputs() {
        let tokenizer = MockTokenizer::echo();
        let tokens = tokenizer.tokenize("ཀ་ ཁ་").unwrap();
        assert_eq!(tokens.len(), 2);
        tokenizer.tokenize("ག་").unwrap();
        assert_eq!(tokenizer.inputs(), vec!["ཀ་ ཁ་", "ག་"]);
        assert_eq!(tokenizer.call_count(), 2);
    }

    #[test]
    fn test_always_fails() {
        let tokenizer = MockTokenizer::always_fails("offline");
        for _ in 0..3 {
            assert!(tokenizer.tokenize("ཀ").is_err());
        }
        assert_eq!(tokenizer.call_count(), 3);
    }
}
