//! Punctuation-aligned chunking of source documents into a corpus plan.

use crate::error::{Result, SegmentError};
use crate::plan::{ChunkMap, CorpusPlan};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tokenizer_client::{AtomicUnit, ChunkType, UnitSplitter};

const BOM: char = '\u{feff}';

/// Split a raw document into the TEXT and PUNCT units used for chunking.
///
/// Line breaks are removed before splitting; OTHER units are dropped.
pub fn document_units(splitter: &dyn UnitSplitter, raw: &str) -> Vec<AtomicUnit> {
    let flattened = raw.replace('\n', "");
    splitter
        .split(&flattened)
        .into_iter()
        .filter(|unit| matches!(unit.kind, ChunkType::Text | ChunkType::Punct))
        .collect()
}

/// Unit ranges of each chunk, paired with the chunk's 1-based index.
///
/// Each range starts `size` units in and is extended up to and including the
/// next PUNCT unit, so only the final range of a document can end elsewhere.
/// The last range may be empty; ranges are clamped to the unit count.
pub fn chunk_spans(units: &[AtomicUnit], size: usize) -> Vec<(usize, Range<usize>)> {
    let len = units.len();
    let mut spans = Vec::new();
    let mut index = 1;
    let mut start = 0;
    let mut end = 0;

    while end <= len {
        end = start + size;
        while end < len && !units[end].is_punct() {
            end += 1;
        }
        // step past the punctuation unit
        end += 1;

        spans.push((index, start.min(len)..end.min(len)));
        index += 1;
        start = end;
    }

    spans
}

/// Chunk a document's units. Empty chunks consume an index but are not recorded.
pub fn chunk_units(units: &[AtomicUnit], size: usize) -> ChunkMap {
    let mut chunks = ChunkMap::new();

    for (index, span) in chunk_spans(units, size) {
        let joined: String = units[span].iter().map(|u| u.text.as_str()).collect();
        let trimmed = joined.trim();
        let text = trimmed.strip_prefix(BOM).unwrap_or(trimmed);
        if !text.is_empty() {
            chunks.insert(index, text.to_string());
        }
    }

    chunks
}

/// Builds corpus plans from a directory of documents.
pub struct ChunkPlanner<'a> {
    splitter: &'a dyn UnitSplitter,
    size: usize,
}

impl<'a> ChunkPlanner<'a> {
    /// Create a planner producing chunks of roughly `size` atomic units.
    pub fn new(splitter: &'a dyn UnitSplitter, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SegmentError::Config(
                "chunk size must be a positive number of units".into(),
            ));
        }
        Ok(Self { splitter, size })
    }

    pub fn chunk_size(&self) -> usize {
        self.size
    }

    /// Chunk one document's raw text.
    pub fn plan_document(&self, raw: &str) -> ChunkMap {
        chunk_units(&document_units(self.splitter, raw), self.size)
    }

    /// List the documents of a source directory in file-name order.
    pub fn source_documents(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(SegmentError::Config(format!(
                "source directory not found: {}",
                dir.display()
            )));
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SegmentError::file(dir, e))? {
            let path = entry?.path();
            if path.is_file() {
                documents.push(path);
            }
        }

        if documents.is_empty() {
            return Err(SegmentError::Config(format!(
                "source directory is empty: {}",
                dir.display()
            )));
        }

        documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(documents)
    }

    /// Chunk the given documents, reporting each one as it is planned.
    pub fn plan_documents<F>(&self, documents: &[PathBuf], mut on_document: F) -> Result<CorpusPlan>
    where
        F: FnMut(&str, usize),
    {
        let mut plan = CorpusPlan::new();

        for path in documents {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    SegmentError::Config(format!("not a document: {}", path.display()))
                })?;
            let raw = fs::read_to_string(path).map_err(|e| SegmentError::file(path, e))?;
            let chunks = self.plan_document(&raw);

            log::debug!("{}: {} chunks", name, chunks.len());
            on_document(&name, chunks.len());
            plan.push_document(name, chunks)?;
        }

        Ok(plan)
    }

    /// Chunk every document of a source directory.
    pub fn plan_directory(&self, dir: &Path) -> Result<CorpusPlan> {
        let documents = Self::source_documents(dir)?;
        self.plan_documents(&documents, |_, _| {})
    }

    /// Chunk a source directory and persist the plan.
    pub fn prepare(&self, dir: &Path, plan_path: &Path) -> Result<CorpusPlan> {
        let plan = self.plan_directory(dir)?;
        plan.save(plan_path)?;
        log::info!(
            "Planned {} chunks across {} documents into {}",
            plan.total(),
            plan.document_count(),
            plan_path.display()
        );
        Ok(plan)
    }
}
