//! The web search collaborator boundary.
//!
//! [`SearchProvider`] is the seam the orchestrator talks through; the
//! pipeline never sees a transport. [`HttpSearchProvider`] is the reference
//! implementation: one JSON POST per lookup, returning the provider's raw
//! text for the adapter to parse. The client is built per call and dropped
//! with it, so the connection is released on every exit path.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PriceSearchError, Result};
use crate::http;

/// The external search capability.
///
/// Implementations perform one search and return the provider's response
/// as raw text. Must be `Send + Sync`; the orchestrator holds it behind an
/// `Arc<dyn SearchProvider>` so tests can inject mocks.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search for `query`, requesting at most `limit` results.
    ///
    /// `include_content` asks the provider to inline full page content
    /// (slower, but what the extractors feed on).
    ///
    /// # Errors
    ///
    /// Returns [`PriceSearchError::Transport`] when the provider cannot be
    /// reached or answers with a non-success status.
    async fn search(&self, query: &str, limit: usize, include_content: bool) -> Result<String>;
}

/// HTTP JSON implementation of [`SearchProvider`].
///
/// POSTs `{"query", "limit", "includeContent"}` to the configured endpoint
/// and accepts either a `{"content": "..."}` envelope or a plain text body.
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    endpoint: String,
    timeout_seconds: u64,
    user_agent: Option<String>,
}

impl HttpSearchProvider {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str, limit: usize, include_content: bool) -> Result<String> {
        tracing::trace!(query, limit, "search provider request");

        let client = http::build_client(self.timeout_seconds, self.user_agent.as_deref())?;

        let response = client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "query": query,
                "limit": limit.min(10),
                "includeContent": include_content,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PriceSearchError::Timeout(format!("search request timed out: {e}"))
                } else {
                    PriceSearchError::Transport(format!("search request failed: {e}"))
                }
            })?
            .error_for_status()
            .map_err(|e| PriceSearchError::Transport(format!("search HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| PriceSearchError::Transport(format!("search response read failed: {e}")))?;

        tracing::trace!(bytes = body.len(), "search provider response received");
        Ok(unwrap_envelope(&body))
    }
}

/// Unwrap a `{"content": "..."}` JSON envelope; anything else is passed
/// through as-is.
fn unwrap_envelope(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(content)) = map.get("content") {
            return content.clone();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mock provider for testing trait bounds and async execution.
    struct MockProvider {
        response: Option<String>,
    }

    #[async_trait]
    impl SearchProvider for MockProvider {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
            _include_content: bool,
        ) -> Result<String> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(PriceSearchError::Transport("mock provider failure".into())),
            }
        }
    }

    #[test]
    fn provider_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SearchProvider>();
    }

    #[tokio::test]
    async fn mock_provider_returns_response() {
        let provider = MockProvider {
            response: Some("**1. Title**\nURL: https://a.com".into()),
        };
        let text = provider.search("laptop price", 5, true).await;
        assert!(text.is_ok());
        assert!(text.expect("should succeed").contains("URL:"));
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider { response: None };
        let result = provider.search("laptop price", 5, true).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("mock provider failure"));
    }

    #[test]
    fn envelope_unwrapped() {
        let body = r#"{"content": "**1. Title**\nURL: https://a.com"}"#;
        assert!(unwrap_envelope(body).starts_with("**1. Title**"));
    }

    #[test]
    fn plain_text_passes_through() {
        let body = "Search completed for \"laptop\" with 2 results:";
        assert_eq!(unwrap_envelope(body), body);
    }

    #[test]
    fn json_without_content_field_passes_through() {
        let body = r#"{"results": []}"#;
        assert_eq!(unwrap_envelope(body), body);
    }
}
