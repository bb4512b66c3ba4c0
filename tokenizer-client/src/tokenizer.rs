use crate::error::Result;
use crate::token::{AtomicUnit, TokenRecord};

/// Trait for word tokenizers
pub trait WordTokenizer {
    /// Tokenize one chunk of plain text into ordered token records
    fn tokenize(&self, text: &str) -> Result<Vec<TokenRecord>>;

    /// Get the tokenizer name for display
    fn name(&self) -> &'static str;

    /// Check if the tokenizer is usable (program installed, etc.)
    fn is_available(&self) -> Result<()>;
}

/// Trait for splitters that break raw text into classified atomic units
pub trait UnitSplitter {
    /// Split text into atomic units whose concatenation is the input
    fn split(&self, text: &str) -> Vec<AtomicUnit>;
}
