//! Session persistence: artifact locations, loading, saving and resetting progress.

use super::types::{CommitJournal, ProgressState, StoredState};
use crate::error::{Result, SegmentError};
use serde_yaml::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Locations of every artifact belonging to one corpus, derived from its plan path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    /// Corpus name (the plan file stem)
    pub name: String,
    /// Chunk plan (`<dir>/<name>.yaml`)
    pub plan: PathBuf,
    /// Progress state (`<dir>/<name>.config`)
    pub state: PathBuf,
    /// Review buffer (`<dir>/<name>_current.txt`)
    pub buffer: PathBuf,
    /// Per-document output files (`<dir>/<name>/`)
    pub output_dir: PathBuf,
    /// Commit journal (`<dir>/<name>.journal`)
    pub journal: PathBuf,
    /// Replacement rule table
    pub replacements: PathBuf,
    /// Lexicon add log
    pub add_log: PathBuf,
    /// Lexicon remove log
    pub remove_log: PathBuf,
}

impl CorpusPaths {
    pub fn new(plan: &Path, dialect: &str) -> Result<Self> {
        let name = plan
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SegmentError::Config(format!("invalid chunk plan path: {}", plan.display()))
            })?;
        let dir = plan
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let adjustments = dir.join("tok_data").join(dialect).join("adjustments");

        Ok(Self {
            plan: plan.to_path_buf(),
            state: dir.join(format!("{}.config", name)),
            buffer: dir.join(format!("{}_current.txt", name)),
            output_dir: dir.join(&name),
            journal: dir.join(format!("{}.journal", name)),
            replacements: adjustments.join("rules").join("replacements.txt"),
            add_log: adjustments.join("words").join(format!("{}.tsv", name)),
            remove_log: adjustments.join("remove").join(format!("{}.tsv", name)),
            name,
        })
    }

    /// Output accumulator for a document.
    pub fn output_file(&self, document: &str) -> PathBuf {
        self.output_dir.join(document)
    }
}

/// Write a file by renaming a fully written temporary file over it.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| SegmentError::file(&dir, e))?;

    let mut file = NamedTempFile::new_in(&dir).map_err(|e| SegmentError::file(&dir, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| SegmentError::file(path, e))?;
    file.persist(path)
        .map_err(|e| SegmentError::file(path, e.error))?;
    Ok(())
}

/// Load the persisted progress state, merged over defaults.
///
/// A missing progress file is a configuration error: the corpus has to be
/// started with a reset first.
pub fn load_state(paths: &CorpusPaths) -> Result<ProgressState> {
    if !paths.state.exists() {
        return Err(SegmentError::Config(format!(
            "no progress state at {}; start the corpus with --new",
            paths.state.display()
        )));
    }

    let content =
        fs::read_to_string(&paths.state).map_err(|e| SegmentError::file(&paths.state, e))?;
    if content.trim().is_empty() {
        return Ok(ProgressState::default());
    }
    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| SegmentError::yaml(&paths.state, e))?;
    if value.is_null() {
        return Ok(ProgressState::default());
    }

    let stored: StoredState =
        serde_yaml::from_value(value).map_err(|e| SegmentError::yaml(&paths.state, e))?;
    Ok(ProgressState::default().merge(stored))
}

/// Save progress state to disk.
pub fn save_state(paths: &CorpusPaths, state: &ProgressState) -> Result<()> {
    let content =
        serde_yaml::to_string(state).map_err(|e| SegmentError::yaml(&paths.state, e))?;
    write_atomic(&paths.state, &content)
}

/// Start a corpus over: fresh state with the plan's total, empty output directory.
pub fn reset_corpus(paths: &CorpusPaths, total: usize) -> Result<ProgressState> {
    let state = ProgressState::new(total);
    save_state(paths, &state)?;

    if paths.output_dir.is_dir() {
        for entry in fs::read_dir(&paths.output_dir)
            .map_err(|e| SegmentError::file(&paths.output_dir, e))?
        {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| SegmentError::file(&path, e))?;
            }
        }
    } else {
        fs::create_dir_all(&paths.output_dir)
            .map_err(|e| SegmentError::file(&paths.output_dir, e))?;
    }

    clear_journal(paths)?;
    log::info!(
        "Reset corpus '{}': {} chunks to segment",
        paths.name,
        total
    );
    Ok(state)
}

/// Read the commit journal left by an interrupted step, if any.
pub fn read_journal(paths: &CorpusPaths) -> Result<Option<CommitJournal>> {
    if !paths.journal.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&paths.journal).map_err(|e| SegmentError::file(&paths.journal, e))?;
    let journal =
        serde_yaml::from_str(&content).map_err(|e| SegmentError::yaml(&paths.journal, e))?;
    Ok(Some(journal))
}

pub fn write_journal(paths: &CorpusPaths, journal: &CommitJournal) -> Result<()> {
    let content =
        serde_yaml::to_string(journal).map_err(|e| SegmentError::yaml(&paths.journal, e))?;
    write_atomic(&paths.journal, &content)
}

pub fn clear_journal(paths: &CorpusPaths) -> Result<()> {
    if paths.journal.exists() {
        fs::remove_file(&paths.journal).map_err(|e| SegmentError::file(&paths.journal, e))?;
    }
    Ok(())
}
