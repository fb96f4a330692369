// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Standup summary generation
//!
//! Builds a prompt from the day's commits and asks an Ollama-compatible
//! inference endpoint (`POST /api/generate`) for a short standup digest.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), daily_standup::summary::GenerationError> {
//! use std::time::Duration;
//! use daily_standup::config::OllamaSettings;
//! use daily_standup::summary::{OllamaClient, Summarizer};
//!
//! let client = OllamaClient::new(OllamaSettings {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2:latest".to_string(),
//!     timeout: Duration::from_secs(120),
//!     attempts: 1,
//! })?;
//! let summary = client.summarize(&[]).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use standup_git::CommitRecord;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::OllamaSettings;

/// Summary used when there is nothing to summarize
pub const NO_ACTIVITY_SUMMARY: &str = "No commits found for today.";

/// Summary generation errors
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The endpoint did not answer within the configured timeout
    #[error("inference request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or transport failure
    #[error("inference endpoint unreachable: {0}")]
    Request(#[source] reqwest::Error),

    /// Non-success HTTP status without an error message
    #[error("inference endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The endpoint answered with an error message
    #[error("inference endpoint error: {0}")]
    Endpoint(String),

    /// The endpoint answered with no text
    #[error("inference endpoint returned an empty response")]
    EmptyResponse,

    /// The response body was not the expected JSON
    #[error("invalid inference response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Clearly marked text substituted for a summary that could not be generated
#[must_use]
pub fn fallback_summary(error: &GenerationError) -> String {
    format!("[summary unavailable: {error}]")
}

/// Anything that can turn a day's commits into a standup summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `commits`
    ///
    /// An empty slice yields a "no activity" summary rather than an error.
    async fn summarize(&self, commits: &[CommitRecord]) -> Result<String, GenerationError>;
}

/// Build the standup prompt for a set of commits
#[must_use]
pub fn build_prompt(commits: &[CommitRecord]) -> String {
    let listed = commits
        .iter()
        .map(|c| format!("- {}", c.message.replace('\n', "\n  ")))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based on these git commit messages from today, provide a concise summary \
         of the work accomplished:\n\n{listed}\n\nPlease provide a brief, professional \
         summary suitable for a daily standup meeting."
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret an `/api/generate` reply
fn interpret_response(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    let parsed = serde_json::from_str::<GenerateResponse>(body);

    if let Ok(GenerateResponse {
        error: Some(message),
        ..
    }) = &parsed
    {
        return Err(GenerationError::Endpoint(message.clone()));
    }
    if !status.is_success() {
        return Err(GenerationError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    match parsed?.response.map(|r| r.trim().to_string()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(GenerationError::EmptyResponse),
    }
}

/// Client for a local Ollama-compatible inference endpoint
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: String,
    settings: OllamaSettings,
}

impl OllamaClient {
    /// Create a client for the given endpoint settings
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Request` if the HTTP client cannot be built.
    pub fn new(settings: OllamaSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GenerationError::Request)?;
        let endpoint = format!("{}/api/generate", settings.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    /// Full URL requests are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout(self.settings.timeout)
        } else {
            GenerationError::Request(error)
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        interpret_response(status, &body)
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(&self, commits: &[CommitRecord]) -> Result<String, GenerationError> {
        if commits.is_empty() {
            debug!("no commits, skipping inference request");
            return Ok(NO_ACTIVITY_SUMMARY.to_string());
        }

        let prompt = build_prompt(commits);
        info!(
            model = %self.settings.model,
            commits = commits.len(),
            "requesting summary"
        );

        let mut attempt = 1;
        loop {
            match self.generate(&prompt).await {
                Ok(summary) => return Ok(summary),
                Err(e) if attempt < self.settings.attempts => {
                    warn!(attempt, error = %e, "inference attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
