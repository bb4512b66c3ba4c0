//! Token and atomic-unit records exchanged with tokenizers.

use serde::{Deserialize, Serialize};

/// Classification shared by atomic units and token records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChunkType {
    Text,
    Punct,
    Other,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Punct => "PUNCT",
            Self::Other => "OTHER",
        }
    }
}

/// Smallest classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicUnit {
    pub kind: ChunkType,
    pub text: String,
}

impl AtomicUnit {
    pub fn new(kind: ChunkType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_punct(&self) -> bool {
        self.kind == ChunkType::Punct
    }
}

/// Affixation metadata attached to a token by the word tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affixation {
    /// Length of the affixed particle in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,

    /// Particle type reported by the tokenizer
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Whether the host word lost a final འ when the particle was attached
    #[serde(default)]
    pub aa: bool,
}

/// One word token as produced by a [`crate::WordTokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub text: String,

    pub chunk_type: ChunkType,

    /// Part-of-speech tag
    #[serde(default)]
    pub pos: Option<String>,

    #[serde(default)]
    pub lemma: Option<String>,

    /// Whether this token is an affixed particle split off its host word
    #[serde(default)]
    pub affix: bool,

    #[serde(default)]
    pub affixation: Option<Affixation>,
}

impl TokenRecord {
    /// Create a bare token with no linguistic annotations.
    pub fn new(chunk_type: ChunkType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chunk_type,
            pos: None,
            lemma: None,
            affix: false,
            affixation: None,
        }
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_affix(mut self, affix: bool) -> Self {
        self.affix = affix;
        self
    }

    pub fn with_affixation(mut self, affixation: Affixation) -> Self {
        self.affixation = Some(affixation);
        self
    }

    /// True when the tokenizer reports an འ-dropping affixation.
    pub fn has_aa(&self) -> bool {
        self.affixation.as_ref().is_some_and(|a| a.aa)
    }
}
