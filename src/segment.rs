//! Transcript segmentation.
//!
//! Splits a raw transcript into chunks no longer than a character budget,
//! preferring to cut just after the last sentence period inside the budget
//! window so chunks end on sentence boundaries whenever the text allows it.

use crate::logger::Logger;

/// A bounded slice of the transcript, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
}

impl Chunk {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Number of characters in this chunk, the unit the size budget uses.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Byte offset where the character after the first `max_chars` characters
/// begins, or `None` when the text already fits the budget.
fn window_end(text: &str, max_chars: usize) -> Option<usize> {
    text.char_indices().nth(max_chars).map(|(offset, _)| offset)
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Each cut prefers the last `.` inside the current window, and the period
/// stays with the chunk before the cut. A window without a period is cut
/// exactly at the budget boundary. Whitespace-only candidates are dropped
/// and the cursor still advances a full window, so pathological input
/// cannot stall the scan. Whatever remains under the budget becomes the
/// final chunk.
///
/// # Panics
///
/// Panics if `max_chars` is zero.
///
/// # Examples
///
/// ```
/// use bylines::logger::{Level, Logger};
/// use bylines::segment::split_transcript;
///
/// let logger = Logger::new(Level::Error);
/// let chunks = split_transcript("Hello world. This is a test.", 15, &logger);
/// let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
/// assert_eq!(texts, ["Hello world.", "This is a test."]);
/// ```
pub fn split_transcript(text: &str, max_chars: usize, logger: &Logger) -> Vec<Chunk> {
    assert!(max_chars > 0, "max_chars must be greater than zero");

    logger.info(format!(
        "Splitting text into chunks with max {max_chars} characters each."
    ));
    logger.info(format!(
        "Total length of input text: {} characters.",
        text.chars().count()
    ));

    let mut chunks = Vec::new();
    let mut remaining = text;

    while let Some(limit) = window_end(remaining, max_chars) {
        let cut = match remaining[..limit].rfind('.') {
            Some(period) => period + 1,
            None => limit,
        };
        let candidate = remaining[..cut].trim();
        if candidate.is_empty() {
            logger.warning("Empty chunk candidate found. Skipping...");
            remaining = remaining[limit..].trim_start();
            continue;
        }
        logger.debug(format!(
            "Adding chunk with {} characters. Remaining text length: {} characters.",
            candidate.chars().count(),
            remaining[cut..].chars().count()
        ));
        chunks.push(Chunk::new(candidate));
        remaining = remaining[cut..].trim_start();
    }

    let tail = remaining.trim();
    if !tail.is_empty() {
        logger.debug(format!(
            "Adding final chunk with {} characters.",
            tail.chars().count()
        ));
        chunks.push(Chunk::new(tail));
    }

    logger.info(format!("Total chunks created: {}", chunks.len()));
    chunks
}
