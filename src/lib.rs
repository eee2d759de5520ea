//! # harga-search
//!
//! Deadline-bounded price discovery for free-text item names.
//!
//! Given an item name ("iPhone 17 Pro Max"), this crate queries an external
//! web search capability, parses the noisy multi-source response, extracts
//! currency-tagged amounts, reconciles them across sources, and reports a
//! per-currency price range, degrading to a static estimate table whenever
//! live search is slow, absent, or inconclusive.
//!
//! ## Design
//!
//! - Two-tier extraction: a deterministic pattern matcher first, a
//!   generative-text oracle only when the fast path lacks confidence
//! - The oracle is untrusted: schema-validated, size-bounded, and
//!   provenance-checked against the text it was shown
//! - Deduplication per (source domain, currency), keeping the lowest amount;
//!   currencies are never compared or merged
//! - Every collaborator call runs under an explicit, cancellable deadline;
//!   late results are abandoned, never awaited further
//! - No failure escapes a lookup; every path ends in a structured report
//!
//! ## Scope
//!
//! - All state is per-lookup; the only cross-lookup state is the read-only
//!   estimate table
//! - Collaborators sit behind `async_trait` seams ([`SearchProvider`],
//!   [`ChatClient`]) so tests and alternative transports plug in freely
//! - Item names are logged only at trace level

pub mod adapter;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod http;
pub mod llm;
pub mod orchestrator;
pub mod provider;
pub mod redirect;
pub mod types;

pub use config::LookupConfig;
pub use error::{PriceSearchError, Result};
pub use llm::{ChatClient, HttpChatClient};
pub use orchestrator::{FallbackReason, PriceLookup};
pub use provider::{HttpSearchProvider, SearchProvider};
pub use types::{PriceCandidate, PriceQuoteSet, PriceRange, PriceReport, PriceSource, SearchResult};

/// Look up a price using only the static estimate table.
///
/// Convenience for callers with no collaborators configured; equivalent to
/// [`PriceLookup::new`] with defaults followed by a lookup.
///
/// # Examples
///
/// ```
/// let report = harga_search::estimate_price("laptop");
/// assert!(report.success);
/// assert_eq!(report.price_range["IDR"].avg, 8_000_000);
/// ```
pub fn estimate_price(item: &str) -> PriceReport {
    // Default config is valid by construction.
    match PriceLookup::new(LookupConfig::default()) {
        Ok(lookup) => lookup.lookup_blocking(item),
        Err(err) => PriceReport {
            success: false,
            item: item.to_string(),
            price_range: Default::default(),
            sample_count: 0,
            sources: Vec::new(),
            message: err.to_string(),
        },
    }
}
