//! One resumable segmentation step: commit the reviewed chunk, open the next one.

use crate::config::SegmentConfig;
use crate::error::{Result, SegmentError};
use crate::plan::{ChunkMap, CorpusPlan};
use crate::session::{
    CommitJournal, CorpusPaths, Phase, ProgressState, clear_journal, percent, read_journal,
    save_state, write_journal,
};
use crate::text::{AdjustmentRules, LexiconLog, ReplacementRules, ReviewFormatter};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tokenizer_client::WordTokenizer;

/// What a single step did.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Document the step worked on
    pub document: String,
    /// Chunk appended to the document's output, if any
    pub committed: Option<usize>,
    /// Chunk written to the review buffer, if any
    pub opened: Option<usize>,
    /// Whether the commit was finished from a journal left by an interrupted step
    pub recovered: bool,
    /// Progress after the step, as persisted
    pub state: ProgressState,
}

/// Drives the commit/open cycle for one corpus.
pub struct Segmenter<'t> {
    plan: CorpusPlan,
    paths: CorpusPaths,
    tokenizer: &'t dyn WordTokenizer,
    formatter: ReviewFormatter,
    rules: AdjustmentRules,
    lexicon: LexiconLog,
}

impl<'t> Segmenter<'t> {
    /// Set up a segmenter, loading the corpus replacement rules.
    pub fn new(
        plan: CorpusPlan,
        paths: CorpusPaths,
        tokenizer: &'t dyn WordTokenizer,
        config: &SegmentConfig,
    ) -> Result<Self> {
        let marker = config.marker_char();
        let replacements = ReplacementRules::load(&paths.replacements)?;
        log::debug!(
            "Loaded {} replacement rules; tokenizer: {}",
            replacements.len(),
            tokenizer.name()
        );

        Ok(Self {
            formatter: ReviewFormatter::new(
                marker,
                config.lemmatization_exceptions.clone(),
                replacements,
            ),
            rules: AdjustmentRules::new(marker),
            lexicon: LexiconLog::for_corpus(&paths),
            plan,
            paths,
            tokenizer,
        })
    }

    pub fn paths(&self) -> &CorpusPaths {
        &self.paths
    }

    /// Run one step on the head of the pending-document queue and persist the result.
    ///
    /// Only `current_file` is touched. Moving on to the next document once this
    /// one is complete is left to the caller (see [`advance_document`]).
    pub fn step(&self, mut state: ProgressState) -> Result<StepReport> {
        let document = match state.current_file.clone() {
            Some(name) => name,
            None => self
                .plan
                .first_document()
                .map(str::to_string)
                .ok_or_else(|| SegmentError::Config("the chunk plan has no documents".into()))?,
        };
        let chunks = self.plan.document(&document).ok_or_else(|| {
            SegmentError::Config(format!("document '{}' is not in the chunk plan", document))
        })?;

        state.current_file = Some(document.clone());
        if state.current_chunk == 0 {
            state.current_chunk = chunks.keys().next().copied().unwrap_or(1);
        }

        let recovered = self.recover(&document, chunks, &mut state)?;
        let committed = match recovered {
            Some(chunk) => Some(chunk),
            None => self.commit(&document, chunks, &mut state)?,
        };
        let opened = self.open(&document, chunks, &state)?;

        save_state(&self.paths, &state)?;
        clear_journal(&self.paths)?;

        Ok(StepReport {
            document,
            committed,
            opened,
            recovered: recovered.is_some(),
            state,
        })
    }

    /// Finish a commit whose state update never reached disk.
    ///
    /// The review buffer may already hold the next chunk by then, so the
    /// journaled text is what gets written, never the buffer.
    fn recover(
        &self,
        document: &str,
        chunks: &ChunkMap,
        state: &mut ProgressState,
    ) -> Result<Option<usize>> {
        let Some(journal) = read_journal(&self.paths)? else {
            return Ok(None);
        };
        if !journal.matches(state) || !chunks.contains_key(&journal.chunk) {
            clear_journal(&self.paths)?;
            return Ok(None);
        }

        let output = self.paths.output_file(&journal.file);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&output)
            .map_err(|e| SegmentError::file(&output, e))?;
        // the append may be missing, partial or complete
        file.set_len(journal.offset)
            .map_err(|e| SegmentError::file(&output, e))?;
        drop(file);
        self.append(&output, &journal.text)?;

        log::warn!(
            "Finished interrupted commit of {} chunk {}",
            journal.file,
            journal.chunk
        );
        Ok(Some(self.advance(document, chunks, state)))
    }

    /// Append the reviewed buffer to the document output and move past its chunk.
    fn commit(
        &self,
        document: &str,
        chunks: &ChunkMap,
        state: &mut ProgressState,
    ) -> Result<Option<usize>> {
        let output = self.paths.output_file(document);

        if !output.exists() {
            // first step in this document: nothing has been reviewed yet
            fs::create_dir_all(&self.paths.output_dir)
                .map_err(|e| SegmentError::file(&self.paths.output_dir, e))?;
            File::create(&output).map_err(|e| SegmentError::file(&output, e))?;
            log::info!("Started document {}", document);
            return Ok(None);
        }
        if !chunks.contains_key(&state.current_chunk) {
            return Ok(None);
        }

        let reviewed = fs::read_to_string(&self.paths.buffer)
            .map_err(|e| SegmentError::file(&self.paths.buffer, e))?;
        let adjusted = self.rules.apply(&reviewed);
        self.lexicon.record(&adjusted)?;

        let offset = fs::metadata(&output)
            .map_err(|e| SegmentError::file(&output, e))?
            .len();
        write_journal(
            &self.paths,
            &CommitJournal {
                file: document.to_string(),
                chunk: state.current_chunk,
                offset,
                text: adjusted.text.clone(),
            },
        )?;
        self.append(&output, &adjusted.text)?;

        Ok(Some(self.advance(document, chunks, state)))
    }

    fn append(&self, output: &Path, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(output)
            .map_err(|e| SegmentError::file(output, e))?;
        write!(file, "\n{}", text).map_err(|e| SegmentError::file(output, e))
    }

    /// Move the state past its current chunk, returning the chunk committed.
    fn advance(&self, document: &str, chunks: &ChunkMap, state: &mut ProgressState) -> usize {
        let committed = state.current_chunk;
        let last = chunks.keys().next_back().copied().unwrap_or(committed);
        state.current_chunk = chunks
            .range(committed + 1..)
            .next()
            .map(|(index, _)| *index)
            .unwrap_or(last + 1);
        state.done += 1;

        log::info!(
            "Committed {} chunk {} ({:.1}% of document, {:.1}% of corpus: {}/{})",
            document,
            committed,
            document_percent(chunks, committed),
            state.percent_done(),
            state.done,
            state.total
        );
        committed
    }

    /// Tokenize the current chunk into the review buffer.
    fn open(
        &self,
        document: &str,
        chunks: &ChunkMap,
        state: &ProgressState,
    ) -> Result<Option<usize>> {
        let Some(text) = chunks.get(&state.current_chunk) else {
            log::info!("Document {} is complete", document);
            return Ok(None);
        };

        let tokens = self.tokenizer.tokenize(text)?;
        let review = self.formatter.format(&tokens);
        fs::write(&self.paths.buffer, review)
            .map_err(|e| SegmentError::file(&self.paths.buffer, e))?;

        log::info!(
            "Opened {} chunk {} for review in {}",
            document,
            state.current_chunk,
            self.paths.buffer.display()
        );
        Ok(Some(state.current_chunk))
    }
}

/// Share of a document's chunks up to and including `chunk`.
///
/// Chunk indices may have gaps, so this counts positions rather than
/// dividing by the highest index.
pub fn document_percent(chunks: &ChunkMap, chunk: usize) -> f64 {
    percent(chunks.range(..=chunk).count(), chunks.len())
}

/// Where the corpus stands for a given progress state.
pub fn phase(plan: &CorpusPlan, state: &ProgressState) -> Result<Phase> {
    if plan.is_empty() || (state.total > 0 && state.done >= state.total) {
        return Ok(Phase::CorpusComplete);
    }
    let Some(document) = state.current_file.as_deref() else {
        return Ok(Phase::NotStarted);
    };
    if plan.document(document).is_none() {
        return Err(SegmentError::Config(format!(
            "document '{}' is not in the chunk plan",
            document
        )));
    }

    if state.current_chunk == 0 {
        Ok(Phase::NotStarted)
    } else if state.current_chunk <= plan.last_index(document) {
        Ok(Phase::MidDocument)
    } else if plan.next_document(document).is_some() {
        Ok(Phase::DocumentComplete)
    } else {
        Ok(Phase::CorpusComplete)
    }
}

/// Move a completed document's state on to the next plan document.
///
/// Returns false when there is no next document.
pub fn advance_document(plan: &CorpusPlan, state: &mut ProgressState) -> bool {
    let next = state
        .current_file
        .as_deref()
        .and_then(|current| plan.next_document(current))
        .map(str::to_string);

    match next {
        Some(next) => {
            log::info!("Moving on to document {}", next);
            state.current_file = Some(next);
            state.current_chunk = 0;
            true
        }
        None => false,
    }
}
