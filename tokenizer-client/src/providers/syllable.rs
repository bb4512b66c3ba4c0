//! Built-in syllable splitter and tokenizer
//!
//! Splits Tibetan text on tsheg boundaries without a dictionary. Every input
//! character ends up in exactly one unit, so the units concatenate back to the
//! original string.

use crate::error::Result;
use crate::token::{AtomicUnit, ChunkType, TokenRecord};
use crate::tokenizer::{UnitSplitter, WordTokenizer};

const TSHEG: char = '\u{0F0B}';
const NON_BREAKING_TSHEG: char = '\u{0F0C}';

fn is_tsheg(c: char) -> bool {
    c == TSHEG || c == NON_BREAKING_TSHEG
}

/// Shad family, head marks, gter marks and bracket marks.
fn is_tibetan_punct(c: char) -> bool {
    matches!(c,
        '\u{0F01}'..='\u{0F0A}'
        | '\u{0F0D}'..='\u{0F14}'
        | '\u{0F3A}'..='\u{0F3D}'
        | '\u{0FD0}'..='\u{0FD4}'
        | '\u{0FD9}'..='\u{0FDA}')
}

fn is_tibetan(c: char) -> bool {
    ('\u{0F00}'..='\u{0FFF}').contains(&c)
}

fn classify(c: char) -> ChunkType {
    if is_tibetan_punct(c) {
        ChunkType::Punct
    } else if is_tibetan(c) {
        ChunkType::Text
    } else {
        ChunkType::Other
    }
}

/// Dictionary-free splitter producing one TEXT unit per syllable
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableSplitter;

impl SyllableSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl UnitSplitter for SyllableSplitter {
    fn split(&self, text: &str) -> Vec<AtomicUnit> {
        let mut units = Vec::new();
        let mut current: Option<AtomicUnit> = None;
        let mut leading = String::new();
        // A syllable is closed by a tsheg or by whitespace
        let mut syllable_closed = false;

        for c in text.chars() {
            if c.is_whitespace() {
                match current.as_mut() {
                    Some(unit) => {
                        unit.text.push(c);
                        syllable_closed = true;
                    }
                    None => leading.push(c),
                }
                continue;
            }

            let kind = classify(c);
            let continues = match current.as_ref() {
                Some(unit) if unit.kind == kind => kind != ChunkType::Text || !syllable_closed,
                _ => false,
            };

            if continues {
                if let Some(unit) = current.as_mut() {
                    unit.text.push(c);
                }
            } else {
                if let Some(unit) = current.take() {
                    units.push(unit);
                }
                let mut unit_text = std::mem::take(&mut leading);
                unit_text.push(c);
                current = Some(AtomicUnit::new(kind, unit_text));
                syllable_closed = false;
            }

            if is_tsheg(c) {
                syllable_closed = true;
            }
        }

        match current {
            Some(unit) => units.push(unit),
            None if !leading.is_empty() => units.push(AtomicUnit::new(ChunkType::Other, leading)),
            None => {}
        }

        units
    }
}

/// Fallback word tokenizer: one token per syllable, no lemmas or POS tags
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableTokenizer {
    splitter: SyllableSplitter,
}

impl SyllableTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WordTokenizer for SyllableTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenRecord>> {
        Ok(self
            .splitter
            .split(text)
            .into_iter()
            .filter(|unit| !unit.text.trim().is_empty())
            .map(|unit| TokenRecord::new(unit.kind, unit.text.trim()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "syllable"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(units: &[AtomicUnit]) -> Vec<ChunkType> {
        units.iter().map(|u| u.kind).collect()
    }

    #[test]
    fn test_split_syllables_and_shad() {
        let units = SyllableSplitter::new().split("བཀྲ་ཤིས་བདེ་ལེགས།");
        assert_eq!(units.len(), 5);
        assert_eq!(units[0].text, "བཀྲ་");
        assert_eq!(units[3].text, "ལེགས");
        assert_eq!(units[4], AtomicUnit::new(ChunkType::Punct, "།"));
    }

    #[test]
    fn test_split_groups_punct_run_with_spaces() {
        let units = SyllableSplitter::new().split("ཀ་། །ཁ་");
        assert_eq!(
            kinds(&units),
            vec![ChunkType::Text, ChunkType::Punct, ChunkType::Text]
        );
        assert_eq!(units[1].text, "། །");
    }

    #[test]
    fn test_split_marks_latin_as_other() {
        let units = SyllableSplitter::new().split("ཀ་ abc ཁ།");
        assert_eq!(
            kinds(&units),
            vec![
                ChunkType::Text,
                ChunkType::Other,
                ChunkType::Text,
                ChunkType::Punct
            ]
        );
        assert_eq!(units[0].text, "ཀ་ ");
        assert_eq!(units[1].text, "abc ");
    }

    #[test]
    fn test_split_whitespace_closes_syllable() {
        let units = SyllableSplitter::new().split("ཀ ཁ");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "ཀ ");
        assert_eq!(units[1].text, "ཁ");
    }

    #[test]
    fn test_split_is_lossless() {
        let text = "  \u{feff}ཀ་ཁ།  ག་ hello, world ང༌ཅ་།།\n";
        let units = SyllableSplitter::new().split(text);
        let joined: String = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_split_whitespace_only() {
        let units = SyllableSplitter::new().split("   ");
        assert_eq!(units, vec![AtomicUnit::new(ChunkType::Other, "   ")]);
        assert!(SyllableSplitter::new().split("").is_empty());
    }

    #[test]
    fn test_syllable_tokenizer() {
        let tokens = SyllableTokenizer::new().tokenize("བཀྲ་ཤིས། ཀ").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["བཀྲ་", "ཤིས", "།", "ཀ"]);
        assert_eq!(tokens[2].chunk_type, ChunkType::Punct);
        assert!(tokens.iter().all(|t| t.lemma.is_none()));
    }
}
