//! Rendering tokenizer output into the review buffer format.

use crate::error::{Result, SegmentError};
use std::fs;
use std::path::Path;
use tokenizer_client::{ChunkType, TokenRecord};

/// Separator between original and replacement in the rule table.
pub const RULE_SEPARATOR: char = '—';

const NON_BREAKING_TSHEG: char = '\u{0F0C}';
const PARTICLE_POS: &str = "PART";
const NON_WORD_POS: &str = "NON_WORD";
const NON_WORD_FLAG: char = '#';

/// Ordered find/replace rules applied to every tokenized chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementRules {
    rules: Vec<(String, String)>,
}

impl ReplacementRules {
    /// Parse `original—replacement` lines. Blank lines are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut rules = Vec::new();

        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let rule = line
                .split_once(RULE_SEPARATOR)
                .filter(|(original, replacement)| {
                    !original.is_empty() && !replacement.contains(RULE_SEPARATOR)
                })
                .ok_or_else(|| {
                    SegmentError::Config(format!(
                        "replacement rule {} is not 'original{}replacement': {:?}",
                        number + 1,
                        RULE_SEPARATOR,
                        line
                    ))
                })?;
            rules.push((rule.0.to_string(), rule.1.to_string()));
        }

        Ok(Self { rules })
    }

    /// Load the rule table; a missing file means no rules.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "No replacement rules at {}; review text is left as tokenized",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| SegmentError::file(path, e))?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in file order, each as a global replacement.
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (original, replacement)| {
                acc.replace(original.as_str(), replacement)
            })
    }
}

/// Turns token records into the whitespace-joined review text.
#[derive(Debug, Clone)]
pub struct ReviewFormatter {
    marker: char,
    lemmatization_exceptions: Vec<String>,
    rules: ReplacementRules,
}

impl ReviewFormatter {
    pub fn new(
        marker: char,
        lemmatization_exceptions: Vec<String>,
        rules: ReplacementRules,
    ) -> Self {
        Self {
            marker,
            lemmatization_exceptions,
            rules,
        }
    }

    /// Render a whole chunk: one word per token, joined by single spaces.
    pub fn format(&self, tokens: &[TokenRecord]) -> String {
        let words: Vec<String> = tokens.iter().map(|t| self.format_token(t)).collect();
        self.rules.apply(&words.join(" "))
    }

    /// Render one token.
    ///
    /// TEXT tokens are reduced to their surface or lemma form and always end
    /// with the marker; anything else keeps its text with spaces turned into `_`.
    pub fn format_token(&self, token: &TokenRecord) -> String {
        if token.chunk_type != ChunkType::Text {
            return token.text.trim().replace(' ', "_");
        }

        let pos = token.pos.as_deref();
        let base = match token.lemma.as_deref().filter(|l| !l.is_empty()) {
            None => token.text.clone(),
            Some(_) if pos == Some(PARTICLE_POS) && token.affix => format!("-{}", token.text),
            Some(_) if pos == Some(PARTICLE_POS) => token.text.clone(),
            Some(lemma) if token.has_aa() && !self.is_exception(&token.text) => lemma.to_string(),
            Some(_) => token.text.clone(),
        };

        let mut word = base.trim().replace(NON_BREAKING_TSHEG, &self.marker.to_string());
        if !word.ends_with(self.marker) {
            word.push(self.marker);
        }
        if pos == Some(NON_WORD_POS) {
            word.push(NON_WORD_FLAG);
        }
        word
    }

    fn is_exception(&self, text: &str) -> bool {
        self.lemmatization_exceptions.iter().any(|e| e == text)
    }
}
