//! Anthropic Messages API client for the planning stages.
//!
//! Both planning stages send an instruction template and expect a reply that
//! parses as JSON, either bare or fenced in a triple-backtick block.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Text completion boundary used by the planning stages.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt and return the model's raw text reply.
    async fn complete(&self, prompt: &str) -> PipelineResult<String>;
}

/// Anthropic Messages API client.
pub struct ClaudeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

impl ClaudeClient {
    /// Create a new client.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LanguageModel for ClaudeClient {
    async fn complete(&self, prompt: &str) -> PipelineResult<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PipelineError::language_service(format!(
                "API returned {status}: {body}"
            )));
        }

        let reply: MessagesResponse = response.json().await?;
        reply
            .content
            .first()
            .map(|block| block.text.clone())
            .ok_or_else(|| PipelineError::language_service("empty completion"))
    }
}

/// Strip an optional markdown code fence and parse the reply as `T`.
///
/// Failure is a [`PipelineError::Schema`] carrying a truncated excerpt of
/// the reply for diagnosis.
pub fn parse_structured<T: DeserializeOwned>(reply: &str) -> PipelineResult<T> {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    let text = text.trim();

    serde_json::from_str(text).map_err(|e| {
        let excerpt: String = reply.chars().take(200).collect();
        PipelineError::schema(format!(
            "could not parse model reply as JSON: {e}. Reply began: {excerpt}"
        ))
    })
}
