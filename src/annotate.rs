//! Chunk annotation with rate-limit retry handling.
//!
//! [`Annotator`] drives a [`CompletionBackend`] one chunk at a time. Rate
//! limits are retried with exponential backoff up to a fixed budget; every
//! other failure aborts immediately.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use thiserror::Error;

use crate::logger::Logger;

/// Instruction sent as the system message with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a professional transcriber. Format the following transcript by adding speaker identification tags with their actual names (e.g., 'Joe Rogan', 'Guest'). Use context within the text to identify the interviewer and interviewee by name wherever possible. Ensure proper formatting with clear speaker labels and appropriate paragraphing.";

/// Failures surfaced by a completion backend.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The service signalled that the caller exceeded its request rate.
    #[error("rate limited by the completion service: {0}")]
    RateLimited(String),
    /// The service rejected the request outright.
    #[error("completion service error: {0}")]
    Api(String),
    /// The request never completed at the transport level.
    #[error("connection error: {0}")]
    Connection(String),
    /// The service answered but the response held no usable completion.
    #[error("unusable completion response: {0}")]
    Parse(String),
}

/// A chat-completion service capable of annotating one chunk of text.
pub trait CompletionBackend {
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, AnnotateError>;
}

/// Backoff before retry `attempt`: 2^attempt seconds, unbounded by policy.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Sends chunks to a completion backend, retrying rate-limited requests.
pub struct Annotator<B> {
    backend: B,
    max_retries: u32,
    logger: Logger,
    sleep: fn(Duration),
}

impl<B: CompletionBackend> Annotator<B> {
    pub fn new(backend: B, max_retries: u32, logger: Logger) -> Self {
        Self {
            backend,
            max_retries,
            logger,
            sleep: thread::sleep,
        }
    }

    #[cfg(test)]
    fn without_sleep(mut self) -> Self {
        self.sleep = |_| {};
        self
    }

    /// Annotate one chunk, retrying rate limits up to the retry budget.
    ///
    /// `ordinal` and `total` feed progress logging only.
    pub fn annotate(&self, text: &str, ordinal: usize, total: usize) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            self.logger.debug(format!(
                "Starting completion request for chunk {ordinal}/{total}."
            ));
            let started = Instant::now();
            match self.backend.complete(SYSTEM_PROMPT, text) {
                Ok(annotated) => {
                    self.logger.debug(format!(
                        "Completion request for chunk {ordinal}/{total} took {:.2}s.",
                        started.elapsed().as_secs_f64()
                    ));
                    self.logger
                        .info(format!("Successfully annotated chunk {ordinal}/{total}."));
                    return Ok(annotated.trim().to_string());
                }
                Err(AnnotateError::RateLimited(message)) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        bail!(
                            "exceeded maximum retries ({}) due to rate limits",
                            self.max_retries
                        );
                    }
                    let delay = backoff_delay(attempt);
                    self.logger.warning(format!(
                        "Rate limit exceeded ({message}). Retrying in {} seconds... (Attempt {attempt}/{})",
                        delay.as_secs(),
                        self.max_retries
                    ));
                    (self.sleep)(delay);
                }
                Err(err) => {
                    self.logger
                        .error(format!("Failed to annotate chunk {ordinal}/{total}: {err}"));
                    return Err(err.into());
                }
            }
        }
    }
}
