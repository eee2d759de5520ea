//! Error types for the harga-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Every variant is locally recovered by the
//! lookup orchestrator; no error escapes a price lookup.

/// Errors that can occur during a price lookup.
#[derive(Debug, thiserror::Error)]
pub enum PriceSearchError {
    /// The search or extraction collaborator was unreachable.
    #[error("transport error: {0}")]
    Transport(String),

    /// A collaborator call exceeded its deadline.
    #[error("deadline exceeded: {0}")]
    Timeout(String),

    /// The extraction oracle returned unusable output.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Invalid lookup configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for harga-search results.
pub type Result<T> = std::result::Result<T, PriceSearchError>;
