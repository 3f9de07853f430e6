//! Runtime defaults and credential resolution.

use std::env;

use anyhow::{bail, Result};

use crate::logger::Logger;

/// Model requested when `--model` is not given.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Retry budget for rate-limited completion requests.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Character budget per chunk sent to the completion service.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 2000;

/// Environment variable consulted when `--api-key` is absent.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Resolve the service credential: explicit flag first, then the
/// environment. Empty and whitespace-only values count as unset.
pub fn resolve_api_key(provided: Option<String>, logger: &Logger) -> Result<String> {
    resolve_with_env(provided, env::var(API_KEY_ENV).ok(), logger)
}

fn resolve_with_env(
    provided: Option<String>,
    env_value: Option<String>,
    logger: &Logger,
) -> Result<String> {
    if let Some(key) = provided.filter(|key| !key.trim().is_empty()) {
        logger.info("Using API key provided via command-line argument.");
        return Ok(key);
    }
    match env_value {
        Some(key) if !key.trim().is_empty() => {
            logger.info(format!(
                "Using API key from {API_KEY_ENV} environment variable."
            ));
            Ok(key)
        }
        _ => bail!(
            "an API key must be provided via --api-key or the {API_KEY_ENV} environment variable"
        ),
    }
}
