use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use bylines::annotate::{AnnotateError, Annotator, CompletionBackend};
use bylines::logger::{Level, Logger};
use bylines::pipeline::{run, PipelineOptions};
use tempfile::TempDir;

/// Marks each chunk it receives so output ordering is checkable.
struct EchoBackend;

impl CompletionBackend for EchoBackend {
    fn complete(&self, _system_prompt: &str, user_text: &str) -> Result<String, AnnotateError> {
        Ok(format!("[Speaker] {user_text}"))
    }
}

/// Replays a scripted sequence of results, one per call.
struct ScriptedBackend {
    script: RefCell<VecDeque<Result<String, AnnotateError>>>,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<String, AnnotateError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
        }
    }
}

impl CompletionBackend for ScriptedBackend {
    fn complete(&self, _system_prompt: &str, _user_text: &str) -> Result<String, AnnotateError> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AnnotateError::Api("script exhausted".to_string())))
    }
}

fn quiet() -> Logger {
    Logger::new(Level::Error)
}

fn write_input(dir: &TempDir, content: &str) -> (PathBuf, PathBuf) {
    let input = dir.path().join("transcript.txt");
    let output = dir.path().join("annotated.txt");
    fs::write(&input, content).unwrap();
    (input, output)
}

fn options(input: PathBuf, output: PathBuf, max_chunk_chars: usize) -> PipelineOptions {
    PipelineOptions {
        input,
        output,
        max_chunk_chars,
        throttle: Duration::ZERO,
    }
}

#[test]
fn annotates_every_chunk_in_order_with_separators() {
    let dir = TempDir::new().unwrap();
    let (input, output) = write_input(&dir, "First sentence. Second sentence.");
    let annotator = Annotator::new(EchoBackend, 0, quiet());

    run(&options(input, output.clone(), 20), &annotator, &quiet()).unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert_eq!(
        written,
        "[Speaker] First sentence.\n\n[Speaker] Second sentence.\n\n"
    );
}

#[test]
fn single_chunk_input_is_annotated_whole() {
    let dir = TempDir::new().unwrap();
    let (input, output) = write_input(&dir, "A short transcript.");
    let annotator = Annotator::new(EchoBackend, 0, quiet());

    run(&options(input, output.clone(), 2000), &annotator, &quiet()).unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert_eq!(written, "[Speaker] A short transcript.\n\n");
}

#[test]
fn output_is_appended_not_truncated() {
    let dir = TempDir::new().unwrap();
    let (input, output) = write_input(&dir, "New material.");
    fs::write(&output, "earlier run\n\n").unwrap();
    let annotator = Annotator::new(EchoBackend, 0, quiet());

    run(&options(input, output.clone(), 2000), &annotator, &quiet()).unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert_eq!(written, "earlier run\n\n[Speaker] New material.\n\n");
}

#[test]
fn failure_keeps_the_finished_prefix() {
    let dir = TempDir::new().unwrap();
    let (input, output) = write_input(&dir, "First sentence. Second sentence.");
    let backend = ScriptedBackend::new(vec![
        Ok("annotated first".to_string()),
        Err(AnnotateError::Api("service fault".to_string())),
    ]);
    let annotator = Annotator::new(backend, 0, quiet());

    let result = run(&options(input, output.clone(), 20), &annotator, &quiet());

    assert!(result.is_err());
    let written = fs::read_to_string(output).unwrap();
    assert_eq!(written, "annotated first\n\n");
}

#[test]
fn whitespace_only_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (input, output) = write_input(&dir, "   \n\t  \n");
    let annotator = Annotator::new(EchoBackend, 0, quiet());

    run(&options(input, output.clone(), 2000), &annotator, &quiet()).unwrap();

    assert!(!output.exists());
}

#[test]
fn missing_input_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("does-not-exist.txt");
    let output = dir.path().join("annotated.txt");
    let annotator = Annotator::new(EchoBackend, 0, quiet());

    let err = run(&options(input, output, 2000), &annotator, &quiet()).unwrap_err();

    assert!(err.to_string().contains("failed to read input file"));
}
