//! Append-only logs of lexicon changes requested during review.

use super::adjust::Adjusted;
use crate::error::{Result, SegmentError};
use crate::session::CorpusPaths;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The word-addition and word-removal logs of a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconLog {
    add_path: PathBuf,
    remove_path: PathBuf,
}

impl LexiconLog {
    pub fn new(add_path: impl Into<PathBuf>, remove_path: impl Into<PathBuf>) -> Self {
        Self {
            add_path: add_path.into(),
            remove_path: remove_path.into(),
        }
    }

    pub fn for_corpus(paths: &CorpusPaths) -> Self {
        Self::new(&paths.add_log, &paths.remove_log)
    }

    /// Append the words of one commit to the logs.
    pub fn record(&self, adjusted: &Adjusted) -> Result<()> {
        append_words(&self.add_path, &adjusted.to_add)?;
        append_words(&self.remove_path, &adjusted.to_remove)?;
        if !adjusted.to_add.is_empty() || !adjusted.to_remove.is_empty() {
            log::debug!(
                "Lexicon: {} to add, {} to remove",
                adjusted.to_add.len(),
                adjusted.to_remove.len()
            );
        }
        Ok(())
    }
}

/// Each batch starts on a new line, so the files begin with an empty line.
fn append_words(path: &Path, words: &[String]) -> Result<()> {
    if words.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SegmentError::file(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SegmentError::file(path, e))?;
    write!(file, "\n{}", words.join("\n")).map_err(|e| SegmentError::file(path, e))?;
    Ok(())
}
