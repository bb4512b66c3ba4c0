//! Text processing: chunk planning, review rendering and correction handling.

pub mod adjust;
pub mod chunker;
pub mod lexicon;
pub mod review;

pub use adjust::{Adjusted, AdjustmentRecord, AdjustmentRules, LexiconOp};
pub use chunker::{ChunkPlanner, chunk_units, document_units};
pub use lexicon::LexiconLog;
pub use review::{ReplacementRules, ReviewFormatter};
