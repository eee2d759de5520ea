//! Shared HTTP client construction for collaborator requests.
//!
//! Provides a configured [`reqwest::Client`] with a stable User-Agent and a
//! per-call timeout. Clients are built per call and dropped with it, so the
//! connection is released on every exit path.

use std::time::Duration;

use crate::error::PriceSearchError;

/// Default User-Agent sent to collaborators.
const USER_AGENT: &str = concat!("harga-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for a single collaborator call.
///
/// # Errors
///
/// Returns [`PriceSearchError::Transport`] if the client cannot be constructed.
pub fn build_client(
    timeout_seconds: u64,
    user_agent: Option<&str>,
) -> Result<reqwest::Client, PriceSearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent.unwrap_or(USER_AGENT))
        .build()
        .map_err(|e| PriceSearchError::Transport(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_defaults() {
        assert!(build_client(20, None).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        assert!(build_client(5, Some("CustomBot/1.0")).is_ok());
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("harga-search/"));
    }
}
