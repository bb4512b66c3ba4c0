//! Tokenizer client library for the corpus-segment workspace
//!
//! Provides the interfaces the segmentation core needs from its linguistic
//! collaborators:
//! - an atomic-unit splitter that classifies raw text as TEXT/PUNCT/OTHER
//! - a word tokenizer that turns a chunk into ordered token records
//!
//! Backends:
//! - Syllable (built-in, dictionary-free)
//! - Command (external tokenizer program over stdin/stdout JSON)
//! - Mock (tests)

pub mod config;
pub mod error;
pub mod token;
pub mod tokenizer;
pub mod providers;

pub use config::TokenizerConfig;
pub use error::{Result, TokenizerError};
pub use token::{Affixation, AtomicUnit, ChunkType, TokenRecord};
pub use tokenizer::{UnitSplitter, WordTokenizer};
pub use providers::{
    CommandTokenizer, MockTokenizer, SyllableSplitter, SyllableTokenizer, TokenizerKind,
    get_tokenizer,
};
