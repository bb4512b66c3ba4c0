//! Progress state management with stop/resume support at chunk granularity.

mod persistence;
mod types;

pub use persistence::{
    CorpusPaths, clear_journal, load_state, read_journal, reset_corpus, save_state,
    write_atomic, write_journal,
};
pub use types::{CommitJournal, Phase, ProgressState, percent};
