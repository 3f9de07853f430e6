//! Blocking client for OpenAI-compatible chat completions.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::annotate::{AnnotateError, CompletionBackend};

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Sampling temperature sent with every request.
const TEMPERATURE: f32 = 0.5;

/// Completion calls on large chunks can run for minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completion client bound to one model behind one endpoint.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key,
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_completion(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, AnnotateError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|err| AnnotateError::Connection(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().unwrap_or_default();
            return Err(AnnotateError::RateLimited(error_message(&body)));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnnotateError::Api(format!(
                "HTTP {status}: {}",
                error_message(&body)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|err| AnnotateError::Parse(err.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AnnotateError::Parse("response contained no completion choices".to_string())
            })
    }
}

impl CompletionBackend for OpenAiClient {
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, AnnotateError> {
        self.request_completion(system_prompt, user_text)
    }
}

/// Pull the human-readable message out of an API error body, falling back
/// to the raw body text.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|err| err.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        });
    match parsed {
        Some(message) => message,
        None => {
            let raw = body.trim();
            if raw.is_empty() {
                "no error detail provided".to_string()
            } else {
                raw.to_string()
            }
        }
    }
}
