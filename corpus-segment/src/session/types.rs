//! Progress state types for resumable segmentation.

use serde::{Deserialize, Serialize};

/// Persisted progress through the corpus.
///
/// `current_chunk` is 1-based; 0 means the current document has not been started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Grand total chunk count of the plan
    pub total: usize,
    /// Chunks committed so far
    pub done: usize,
    /// Document being worked on
    pub current_file: Option<String>,
    /// Chunk of `current_file` sitting in the review buffer
    pub current_chunk: usize,
}

/// Progress file contents as found on disk; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StoredState {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    done: Option<usize>,
    #[serde(default)]
    current_file: Option<String>,
    #[serde(default)]
    current_chunk: Option<usize>,
}

impl ProgressState {
    /// Initial state for a corpus with `total` chunks.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Overwrite fields with the ones present in a stored state.
    pub(crate) fn merge(mut self, stored: StoredState) -> Self {
        if let Some(total) = stored.total {
            self.total = total;
        }
        if let Some(done) = stored.done {
            self.done = done;
        }
        if stored.current_file.is_some() {
            self.current_file = stored.current_file;
        }
        if let Some(chunk) = stored.current_chunk {
            self.current_chunk = chunk;
        }
        self
    }

    /// Overall completion in percent.
    pub fn percent_done(&self) -> f64 {
        percent(self.done, self.total)
    }
}

/// Percentage helper that treats an empty denominator as zero progress.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Where the segmentation stands, derived from [`ProgressState`] and the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No document or chunk selected yet
    NotStarted,
    /// A chunk of the current document is open for review
    MidDocument,
    /// Every chunk of the current document has been committed
    DocumentComplete,
    /// Every chunk of the corpus has been committed
    CorpusComplete,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::MidDocument => "in progress",
            Self::DocumentComplete => "document complete",
            Self::CorpusComplete => "corpus complete",
        }
    }
}

/// Marker written before a commit appends to an output file.
///
/// If it survives into the next run with the same file and chunk as the
/// persisted state, the output is cut back to `offset` and `text` is
/// appended again, so the step finishes the commit it started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitJournal {
    pub file: String,
    pub chunk: usize,
    /// Output file length before the append
    pub offset: u64,
    /// Corrected chunk text being appended
    pub text: String,
}

impl CommitJournal {
    /// Whether this journal describes the commit the given state is about to make.
    pub fn matches(&self, state: &ProgressState) -> bool {
        state.current_file.as_deref() == Some(self.file.as_str())
            && state.current_chunk == self.chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ProgressState::new(12);
        assert_eq!(state.total, 12);
        assert_eq!(state.done, 0);
        assert!(state.current_file.is_none());
        assert_eq!(state.current_chunk, 0);
    }

    #[test]
    fn test_merge_only_present_fields() {
        let stored: StoredState = serde_yaml::from_str("done: 4\ncurrent_file: a.txt\n").unwrap();
        let state = ProgressState::new(10).merge(stored);
        assert_eq!(state.total, 10);
        assert_eq!(state.done, 4);
        assert_eq!(state.current_file.as_deref(), Some("a.txt"));
        assert_eq!(state.current_chunk, 0);
    }

    #[test]
    fn test_merge_ignores_unknown_and_null_fields() {
        let stored: StoredState =
            serde_yaml::from_str("total: 3\ncurrent_file: null\ncurrent_chunk: null\nextra: 1\n")
                .unwrap();
        let state = ProgressState::default().merge(stored);
        assert_eq!(state, ProgressState::new(3));
    }

    #[test]
    fn test_yaml_field_order() {
        let state = ProgressState {
            total: 3,
            done: 1,
            current_file: Some("a.txt".to_string()),
            current_chunk: 2,
        };
        let yaml = serde_yaml::to_string(&state).unwrap();
        assert_eq!(yaml, "total: 3\ndone: 1\ncurrent_file: a.txt\ncurrent_chunk: 2\n");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert!((percent(1, 4) - 25.0).abs() < 0.001);
        let state = ProgressState {
            done: 3,
            ..ProgressState::new(4)
        };
        assert!((state.percent_done() - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_journal_matches() {
        let journal = CommitJournal {
            file: "a.txt".to_string(),
            chunk: 2,
            offset: 10,
            text: "ཀ་ཁ་".to_string(),
        };
        let mut state = ProgressState {
            current_file: Some("a.txt".to_string()),
            current_chunk: 2,
            ..ProgressState::new(5)
        };
        assert!(journal.matches(&state));
        state.current_chunk = 3;
        assert!(!journal.matches(&state));
    }
}
