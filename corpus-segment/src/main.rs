//! corpus-segment - Resumable, human-reviewed word segmentation of raw-text corpora

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corpus_segment::plan::CorpusPlan;
use corpus_segment::session::{load_state, percent, reset_corpus};
use corpus_segment::text::ChunkPlanner;
use corpus_segment::{CorpusPaths, Phase, SegmentConfig, Segmenter, advance_document, phase};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokenizer_client::{SyllableSplitter, TokenizerKind, get_tokenizer};

#[derive(Parser, Debug)]
#[command(name = "corpus-segment")]
#[command(about = "Segment a corpus one reviewed chunk at a time", long_about = None)]
#[command(version)]
struct Args {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Start the corpus over: reset progress and empty the outputs
    #[arg(long)]
    new: bool,

    /// Chunk size in atomic units when the plan has to be built
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Settings file (default: <config_dir>/cli-programs/corpus-segment.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug)]
struct CorpusArgs {
    /// Directory holding the source documents
    #[arg(default_value = "input")]
    input: PathBuf,

    /// Chunk plan file; every other artifact lives next to it
    #[arg(default_value = "output/chunks.yaml")]
    plan: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the chunk plan without stepping
    Plan {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Rebuild the plan even if it already exists
        #[arg(long)]
        force: bool,

        /// Chunk size in atomic units
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Show progress through the corpus
    Status {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default chunk size
    SetChunkSize {
        /// Size in atomic units
        value: usize,
    },
    /// Set the word tokenizer
    SetTokenizer {
        /// Tokenizer kind (syllable, command)
        kind: String,
        /// Program to run for the command tokenizer
        #[arg(long)]
        program: Option<String>,
        /// Arguments passed to the program
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Set the tokenizer data dialect
    SetDialect {
        /// Dialect name (subdirectory of tok_data)
        dialect: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(SegmentConfig::config_path);
    let mut config = SegmentConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    match &args.command {
        Some(Commands::Config { action }) => {
            return handle_config_command(action, &config_path);
        }
        Some(Commands::Plan {
            corpus,
            force,
            chunk_size,
        }) => {
            if let Some(size) = chunk_size {
                config.chunk_size = *size;
            }
            config.validate()?;
            if corpus.plan.exists() && !force {
                anyhow::bail!(
                    "Chunk plan already exists: {} (use --force to rebuild)",
                    corpus.plan.display()
                );
            }
            build_plan(corpus, &config)?;
            return Ok(());
        }
        Some(Commands::Status { corpus }) => {
            return show_status(corpus, &config);
        }
        None => {}
    }

    if let Some(size) = args.chunk_size {
        config.chunk_size = size;
    }
    config.validate()?;

    if args.debug {
        eprintln!("Input: {}", args.corpus.input.display());
        eprintln!("Plan: {}", args.corpus.plan.display());
        eprintln!("Config: {}", config_path.display());
        eprintln!("Tokenizer: {}", config.tokenizer.kind);
    }

    run_step(&args.corpus, &config, args.new)
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp(None);
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

/// Chunk every source document and persist the plan.
fn build_plan(corpus: &CorpusArgs, config: &SegmentConfig) -> Result<CorpusPlan> {
    let splitter = SyllableSplitter::new();
    let planner = ChunkPlanner::new(&splitter, config.chunk_size)?;
    let documents = ChunkPlanner::source_documents(&corpus.input)?;

    eprintln!(
        "Planning {} documents from {} ({} units per chunk)...",
        documents.len(),
        corpus.input.display(),
        planner.chunk_size()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    let plan = planner.plan_documents(&documents, |name, chunks| {
        pb.set_message(format!("{}: {} chunks", name, chunks));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    plan.save(&corpus.plan)
        .with_context(|| format!("Failed to write chunk plan {}", corpus.plan.display()))?;
    eprintln!(
        "Planned {} chunks across {} documents: {}",
        plan.total(),
        plan.document_count(),
        corpus.plan.display()
    );
    Ok(plan)
}

fn load_plan(plan_path: &Path) -> Result<CorpusPlan> {
    CorpusPlan::load(plan_path)
        .with_context(|| format!("Failed to load chunk plan {}", plan_path.display()))
}

/// Run a single segmentation step, building the plan first if needed.
fn run_step(corpus: &CorpusArgs, config: &SegmentConfig, new: bool) -> Result<()> {
    let plan = if corpus.plan.exists() {
        load_plan(&corpus.plan)?
    } else {
        build_plan(corpus, config)?
    };
    let paths = CorpusPaths::new(&corpus.plan, &config.dialect)?;

    let mut state = if new {
        reset_corpus(&paths, plan.total())?
    } else {
        load_state(&paths)?
    };

    match phase(&plan, &state)? {
        Phase::CorpusComplete => {
            eprintln!(
                "Corpus complete: {}/{} chunks committed",
                state.done, state.total
            );
            return Ok(());
        }
        Phase::DocumentComplete => {
            advance_document(&plan, &mut state);
        }
        Phase::NotStarted | Phase::MidDocument => {}
    }

    let tokenizer = get_tokenizer(&config.tokenizer).context("Failed to set up tokenizer")?;
    let segmenter = Segmenter::new(plan, paths, tokenizer.as_ref(), config)?;
    let report = segmenter.step(state)?;

    if let Some(chunk) = report.committed {
        eprintln!("Committed {} chunk {}", report.document, chunk);
    }
    match report.opened {
        Some(chunk) => eprintln!(
            "Review {} chunk {} in {}",
            report.document,
            chunk,
            segmenter.paths().buffer.display()
        ),
        None => eprintln!("Finished {}", report.document),
    }
    eprintln!(
        "Progress: {}/{} chunks ({:.1}%)",
        report.state.done,
        report.state.total,
        report.state.percent_done()
    );

    Ok(())
}

fn show_status(corpus: &CorpusArgs, config: &SegmentConfig) -> Result<()> {
    let plan = load_plan(&corpus.plan)?;
    let paths = CorpusPaths::new(&corpus.plan, &config.dialect)?;
    let state = load_state(&paths)?;
    let phase = phase(&plan, &state)?;

    println!("Corpus: {} ({} documents)", paths.name, plan.document_count());
    println!(
        "Progress: {}/{} chunks ({:.1}%)",
        state.done,
        state.total,
        state.percent_done()
    );
    match state.current_file.as_deref() {
        Some(document) => {
            let (committed, count) = plan
                .document(document)
                .map(|chunks| (chunks.range(..state.current_chunk).count(), chunks.len()))
                .unwrap_or((0, 0));
            println!("Document: {}", document);
            println!(
                "Chunk: {} ({}/{} committed, {:.1}%)",
                state.current_chunk,
                committed,
                count,
                percent(committed, count)
            );
        }
        None => println!("Document: (none)"),
    }
    println!("Phase: {}", phase.label());
    Ok(())
}

fn handle_config_command(action: &ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = SegmentConfig::load_from(config_path)?;
            println!("Configuration file: {}", config_path.display());
            println!();
            println!("chunk_size = {}", config.chunk_size);
            println!("marker = \"{}\"", config.marker);
            println!("dialect = \"{}\"", config.dialect);
            println!(
                "lemmatization_exceptions = {:?}",
                config.lemmatization_exceptions
            );
            println!("tokenizer.kind = \"{}\"", config.tokenizer.kind);
            if let Some(program) = &config.tokenizer.program {
                println!("tokenizer.program = \"{}\"", program);
            }
            if !config.tokenizer.args.is_empty() {
                println!("tokenizer.args = {:?}", config.tokenizer.args);
            }
        }
        ConfigAction::SetChunkSize { value } => {
            let mut config = SegmentConfig::load_from(config_path)?;
            config.chunk_size = *value;
            config.validate()?;
            config.save_to(config_path)?;
            println!("Default chunk size set to: {}", config.chunk_size);
        }
        ConfigAction::SetTokenizer {
            kind,
            program,
            args,
        } => {
            let kind = TokenizerKind::parse(kind)?;
            if kind == TokenizerKind::Command && program.is_none() {
                anyhow::bail!("The command tokenizer needs --program");
            }
            let mut config = SegmentConfig::load_from(config_path)?;
            config.tokenizer.kind = match kind {
                TokenizerKind::Syllable => "syllable",
                TokenizerKind::Command => "command",
            }
            .to_string();
            config.tokenizer.program = program.clone();
            config.tokenizer.args = args.clone();
            config.save_to(config_path)?;
            println!("Tokenizer set to: {}", config.tokenizer.kind);
        }
        ConfigAction::SetDialect { dialect } => {
            let mut config = SegmentConfig::load_from(config_path)?;
            config.dialect = dialect.clone();
            config.validate()?;
            config.save_to(config_path)?;
            println!("Dialect set to: {}", config.dialect);
        }
    }
    Ok(())
}
