//! Integration tests for the corpus-segment CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Corpus {
    _dir: TempDir,
    input: PathBuf,
    plan: PathBuf,
    settings: PathBuf,
}

impl Corpus {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.txt"), "ཀ་ཁ། ག་ང།").unwrap();
        fs::write(dir.path().join("settings.toml"), "chunk_size = 1\n").unwrap();

        Self {
            input,
            plan: dir.path().join("output").join("chunks.yaml"),
            settings: dir.path().join("settings.toml"),
            _dir: dir,
        }
    }

    fn output_dir(&self) -> &Path {
        self.plan.parent().unwrap()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("corpus-segment").unwrap();
        cmd.arg("--config").arg(&self.settings);
        cmd
    }

    fn step(&self, new: bool) -> Command {
        let mut cmd = self.cmd();
        if new {
            cmd.arg("--new");
        }
        cmd.arg(&self.input).arg(&self.plan);
        cmd
    }
}

#[test]
fn test_first_run_plans_and_opens_chunk() {
    let corpus = Corpus::new();

    corpus
        .step(true)
        .assert()
        .success()
        .stderr(predicate::str::contains("Review a.txt chunk 1"));

    let plan = fs::read_to_string(&corpus.plan).unwrap();
    assert!(plan.starts_with("total: 2"));
    let buffer = fs::read_to_string(corpus.output_dir().join("chunks_current.txt")).unwrap();
    assert!(buffer.contains("ཀ་"));
    assert!(corpus.output_dir().join("chunks").join("a.txt").exists());
}

#[test]
fn test_second_run_commits() {
    let corpus = Corpus::new();
    corpus.step(true).assert().success();

    corpus
        .step(false)
        .assert()
        .success()
        .stderr(predicate::str::contains("Committed a.txt chunk 1"))
        .stderr(predicate::str::contains("Progress: 1/2"));

    let output = fs::read_to_string(corpus.output_dir().join("chunks").join("a.txt")).unwrap();
    assert!(output.starts_with('\n'));
    assert!(output.contains("ཀ་"));
}

#[test]
fn test_resume_without_state_suggests_new() {
    let corpus = Corpus::new();

    corpus
        .step(false)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--new"));
}

#[test]
fn test_missing_input_directory_fails() {
    let corpus = Corpus::new();
    fs::remove_dir_all(&corpus.input).unwrap();

    corpus
        .step(true)
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory not found"));
}

#[test]
fn test_completed_corpus_does_not_step() {
    let corpus = Corpus::new();
    corpus.step(true).assert().success();
    corpus.step(false).assert().success();
    corpus.step(false).assert().success();

    corpus
        .step(false)
        .assert()
        .success()
        .stderr(predicate::str::contains("Corpus complete: 2/2"));
}

#[test]
fn test_status_reports_progress() {
    let corpus = Corpus::new();
    corpus.step(true).assert().success();

    corpus
        .cmd()
        .arg("status")
        .arg(&corpus.input)
        .arg(&corpus.plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0/2"))
        .stdout(predicate::str::contains("Document: a.txt"))
        .stdout(predicate::str::contains("Phase: in progress"));
}

#[test]
fn test_plan_refuses_to_overwrite_without_force() {
    let corpus = Corpus::new();
    let plan_cmd = |force: bool| {
        let mut cmd = corpus.cmd();
        cmd.arg("plan");
        if force {
            cmd.arg("--force");
        }
        cmd.arg(&corpus.input).arg(&corpus.plan);
        cmd
    };

    plan_cmd(false).assert().success();
    plan_cmd(false)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    plan_cmd(true).assert().success();
}

#[test]
fn test_config_set_chunk_size() {
    let corpus = Corpus::new();

    corpus
        .cmd()
        .args(["config", "set-chunk-size", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));

    let settings = fs::read_to_string(&corpus.settings).unwrap();
    assert!(settings.contains("chunk_size = 42"));

    corpus
        .cmd()
        .args(["config", "set-chunk-size", "0"])
        .assert()
        .failure();
}
