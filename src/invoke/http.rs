//! OpenRouter-compatible HTTP invoker.
//!
//! Speaks the OpenAI-style `/chat/completions` dialect that OpenRouter
//! (and most aggregators) expose. One attempt is one POST; timeouts are
//! enforced by the executors, not here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::registry::Backend;

use super::{BackendInvoker, InvokePayload};

/// Default API base URL (OpenRouter).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response body. Only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`BackendInvoker`] over an OpenRouter-compatible HTTP API.
pub struct HttpInvoker {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpInvoker {
    /// Create an invoker against the default OpenRouter endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create an invoker against a custom base URL (e.g. a proxy or a
    /// test server).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl BackendInvoker for HttpInvoker {
    async fn invoke(&self, backend: &Backend, payload: &InvokePayload) -> Result<String> {
        let body = ChatRequest {
            model: backend.name(),
            messages: vec![ChatMessage {
                role: "user",
                content: &payload.text,
            }],
            max_tokens: payload.max_tokens,
            temperature: payload.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(backend = backend.name(), %url, "posting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DispatchError::BackendRejected {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DispatchError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Truncate an error body for inclusion in an error message.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
