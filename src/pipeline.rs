//! The sequential annotation pipeline.
//!
//! Reads the transcript, splits it, annotates each chunk in order, and
//! appends results to the output file as they arrive. Chunks are strictly
//! sequential: the next request only starts once the previous chunk has
//! been written out.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::annotate::{Annotator, CompletionBackend};
use crate::logger::Logger;
use crate::segment::split_transcript;

/// Pause between chunk requests, a crude throttle on top of retry handling.
pub const CHUNK_THROTTLE: Duration = Duration::from_secs(2);

/// Everything the driver loop needs besides the annotator itself.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_chunk_chars: usize,
    pub throttle: Duration,
}

/// Read the whole transcript into memory as UTF-8.
pub fn read_transcript(path: &Path, logger: &Logger) -> Result<String> {
    logger.info(format!("Reading input file: {}", path.display()));
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    logger.success(format!(
        "Successfully read {} characters from input file.",
        content.chars().count()
    ));
    Ok(content)
}

/// Append one annotated chunk plus a blank-line separator.
///
/// The handle is opened and closed per call so nothing stays open across
/// the next network request.
pub fn append_chunk(path: &Path, annotated: &str, logger: &Logger) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    file.write_all(annotated.as_bytes())
        .and_then(|()| file.write_all(b"\n\n"))
        .with_context(|| format!("failed to write to output file {}", path.display()))?;
    logger.success(format!("Successfully wrote chunk to {}.", path.display()));
    Ok(())
}

/// Drive a whole run: read, split, annotate in order, append as results
/// arrive so a failed run keeps its finished prefix.
pub fn run<B: CompletionBackend>(
    options: &PipelineOptions,
    annotator: &Annotator<B>,
    logger: &Logger,
) -> Result<()> {
    let transcript = read_transcript(&options.input, logger)?;
    let chunks = split_transcript(&transcript, options.max_chunk_chars, logger);

    let total = chunks.len();
    logger.info(format!("Starting to process {total} chunks."));

    for (index, chunk) in chunks.iter().enumerate() {
        let ordinal = index + 1;
        logger.debug(format!(
            "Processing chunk {ordinal}/{total} with {} characters.",
            chunk.char_count()
        ));
        let annotated = annotator.annotate(&chunk.text, ordinal, total)?;
        append_chunk(&options.output, &annotated, logger)?;
        logger.info(format!("Completed processing chunk {ordinal}/{total}."));
        if ordinal < total {
            thread::sleep(options.throttle);
        }
    }

    logger.info("Transcript formatting and speaker identification completed successfully.");
    Ok(())
}
