//! Resumable, human-reviewed word segmentation of raw-text corpora.
//!
//! A corpus is planned once into punctuation-aligned chunks. Each later run
//! performs a single step: the reviewed chunk in the review buffer is
//! corrected and committed to its document's output, then the next chunk is
//! tokenized into the buffer for review.

pub mod config;
pub mod error;
pub mod plan;
pub mod segmenter;
pub mod session;
pub mod text;

pub use config::SegmentConfig;
pub use error::{Result, SegmentError};
pub use plan::CorpusPlan;
pub use segmenter::{Segmenter, StepReport, advance_document, phase};
pub use session::{CorpusPaths, Phase, ProgressState};
