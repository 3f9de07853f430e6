use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use bylines::annotate::Annotator;
use bylines::config::{self, resolve_api_key};
use bylines::logger::{Level, Logger};
use bylines::openai::OpenAiClient;
use bylines::pipeline::{self, PipelineOptions};

/// Bylines - transcript speaker annotation tool
///
/// Splits a raw transcript into sentence-aligned chunks and sends each one
/// to a chat-completion service that adds speaker identification tags with
/// the speakers' actual names.
#[derive(Parser, Debug)]
#[command(name = "bylines")]
#[command(version = "0.1.0")]
#[command(about = "Adds speaker identification to raw transcripts", long_about = None)]
struct Args {
    /// Input transcript file path
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Output file path (annotated chunks are appended as they finish)
    #[arg(value_name = "OUTPUT")]
    output_file: PathBuf,

    /// API key for the completion service (falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model to request from the completion service
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Maximum retries for rate-limited requests
    #[arg(long, default_value_t = config::DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Maximum characters per chunk sent to the service
    #[arg(long, default_value_t = config::DEFAULT_MAX_CHUNK_CHARS)]
    max_chunk_chars: usize,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_chunk_chars > 0,
            "--max-chunk-chars must be greater than zero"
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    args.validate()?;

    let logger = Logger::new(Level::Debug);

    // Resolve credentials before touching the input file.
    let api_key = resolve_api_key(args.api_key, &logger)?;
    let client = OpenAiClient::new(api_key, args.model)?;
    let annotator = Annotator::new(client, args.max_retries, logger.clone());

    let options = PipelineOptions {
        input: args.input_file,
        output: args.output_file,
        max_chunk_chars: args.max_chunk_chars,
        throttle: pipeline::CHUNK_THROTTLE,
    };

    pipeline::run(&options, &annotator, &logger)
}
