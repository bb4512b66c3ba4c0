//! The persisted corpus plan: every document's numbered chunks plus a grand total.

use crate::error::{Result, SegmentError};
use crate::session::write_atomic;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key reserved for the grand total in the plan file.
pub const TOTAL_KEY: &str = "total";

/// Chunk index (1-based, possibly with gaps) to chunk text.
pub type ChunkMap = BTreeMap<usize, String>;

/// Ordered mapping from document name to its chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusPlan {
    total: usize,
    documents: Vec<(String, ChunkMap)>,
}

impl CorpusPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document, keeping the grand total in sync.
    pub fn push_document(&mut self, name: impl Into<String>, chunks: ChunkMap) -> Result<()> {
        let name = name.into();
        if name == TOTAL_KEY {
            return Err(SegmentError::Config(format!(
                "a document may not be named '{}'",
                TOTAL_KEY
            )));
        }
        if self.document(&name).is_some() {
            return Err(SegmentError::Config(format!(
                "document '{}' appears twice in the plan",
                name
            )));
        }
        self.total += chunks.len();
        self.documents.push((name, chunks));
        Ok(())
    }

    /// Grand total chunk count across all documents.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Documents in plan order.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &ChunkMap)> {
        self.documents
            .iter()
            .map(|(name, chunks)| (name.as_str(), chunks))
    }

    pub fn document(&self, name: &str) -> Option<&ChunkMap> {
        self.documents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, chunks)| chunks)
    }

    pub fn first_document(&self) -> Option<&str> {
        self.documents.first().map(|(name, _)| name.as_str())
    }

    /// The document following `name` in plan order.
    pub fn next_document(&self, name: &str) -> Option<&str> {
        let position = self.documents.iter().position(|(n, _)| n == name)?;
        self.documents
            .get(position + 1)
            .map(|(name, _)| name.as_str())
    }

    /// Highest chunk index recorded for a document (0 when it has none).
    pub fn last_index(&self, name: &str) -> usize {
        self.document(name)
            .and_then(|chunks| chunks.keys().next_back().copied())
            .unwrap_or(0)
    }

    /// Render as YAML: `total` first, then each document's chunk mapping.
    pub fn to_yaml(&self) -> Result<String> {
        let mut root = Mapping::new();
        root.insert(
            Value::String(TOTAL_KEY.to_string()),
            Value::Number((self.total as u64).into()),
        );
        for (name, chunks) in &self.documents {
            let mut entries = Mapping::new();
            for (index, text) in chunks {
                entries.insert(
                    Value::Number((*index as u64).into()),
                    Value::String(text.clone()),
                );
            }
            root.insert(Value::String(name.clone()), Value::Mapping(entries));
        }
        serde_yaml::to_string(&Value::Mapping(root))
            .map_err(|e| SegmentError::Config(format!("cannot render plan: {}", e)))
    }

    /// Parse a plan previously written by [`CorpusPlan::to_yaml`].
    ///
    /// A missing `total` is recomputed from the documents.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self> {
        let root: Value =
            serde_yaml::from_str(content).map_err(|e| SegmentError::yaml(origin, e))?;
        let Value::Mapping(root) = root else {
            return Err(malformed(origin, "top level is not a mapping"));
        };

        let mut plan = CorpusPlan::new();
        let mut declared_total = None;

        for (key, value) in root {
            let key = scalar_to_string(&key)
                .ok_or_else(|| malformed(origin, "document names must be scalars"))?;
            if key == TOTAL_KEY {
                let total = value
                    .as_u64()
                    .ok_or_else(|| malformed(origin, "total is not a non-negative integer"))?;
                declared_total = Some(total as usize);
                continue;
            }
            let chunks = parse_chunks(&key, value, origin)?;
            plan.push_document(key, chunks)?;
        }

        if let Some(total) = declared_total {
            plan.total = total;
        }
        Ok(plan)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SegmentError::file(path, e))?;
        Self::from_yaml(&content, path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_yaml()?)
    }
}

fn parse_chunks(document: &str, value: Value, origin: &Path) -> Result<ChunkMap> {
    let entries = match value {
        Value::Mapping(entries) => entries,
        Value::Null => return Ok(ChunkMap::new()),
        _ => {
            return Err(malformed(
                origin,
                &format!("chunks of '{}' are not a mapping", document),
            ));
        }
    };

    let mut chunks = ChunkMap::new();
    for (index, text) in entries {
        let index = match &index {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|index| *index > 0)
        .ok_or_else(|| {
            malformed(
                origin,
                &format!("chunk keys of '{}' must be positive integers", document),
            )
        })?;
        let text = scalar_to_string(&text).ok_or_else(|| {
            malformed(
                origin,
                &format!("chunk {} of '{}' is not text", index, document),
            )
        })?;
        chunks.insert(index, text);
    }
    Ok(chunks)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn malformed(origin: &Path, detail: &str) -> SegmentError {
    SegmentError::Config(format!(
        "malformed chunk plan {}: {}",
        origin.display(),
        detail
    ))
}
