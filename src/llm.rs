//! The generative extraction collaborator boundary.
//!
//! [`ChatClient`] is a single-exchange chat seam: one system instruction,
//! one user message, one text reply. [`HttpChatClient`] speaks the
//! OpenAI-compatible `/v1/chat/completions` surface, non-streaming, with
//! optional bearer auth. That is enough for any of the usual hosted or local
//! providers.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PriceSearchError, Result};
use crate::http;

/// The external generative-text capability.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One chat exchange: `system` instruction plus `user` message, returning
    /// the assistant's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`PriceSearchError::Transport`] for network/HTTP failures and
    /// [`PriceSearchError::Extraction`] when the reply has no usable content.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI-compatible chat completions client.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_seconds: u64,
}

impl HttpChatClient {
    /// `base_url` excludes the `/v1` suffix (e.g. `https://api.openai.com`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            timeout_seconds,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let client = http::build_client(self.timeout_seconds, None)?;
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.0,
        });

        let mut request = client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PriceSearchError::Timeout(format!("chat request timed out: {e}"))
                } else {
                    PriceSearchError::Transport(format!("chat request failed: {e}"))
                }
            })?
            .error_for_status()
            .map_err(|e| PriceSearchError::Transport(format!("chat HTTP error: {e}")))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| PriceSearchError::Transport(format!("chat response read failed: {e}")))?;

        parse_completion(&payload)
    }
}

/// Pull the assistant text out of a chat completion payload.
fn parse_completion(payload: &Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            PriceSearchError::Extraction("chat completion has no message content".into())
        })
}
