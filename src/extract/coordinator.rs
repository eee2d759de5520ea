//! Extraction strategy selection, deduplication, and aggregation.
//!
//! # Pipeline
//!
//! 1. Run the fast extractor over the adapted results
//! 2. If it is confident, use its candidates; otherwise delegate to the
//!    semantic extractor and use its candidates only on `success`
//! 3. Fold surviving candidates into a [`PriceQuoteSet`], keeping the
//!    minimum amount per `(domain, currency)` pair
//! 4. `None` when nothing survives
//!
//! Strategy selection is an explicit two-variant [`ExtractionOutcome`]
//! chosen by the fast path's confidence predicate, inspectable in tests
//! without mocking a type hierarchy. Steps 3–4 are pure, single-threaded
//! folds over an already-completed candidate list: identical input yields
//! an identical quote set.

use crate::config::LookupConfig;
use crate::llm::ChatClient;
use crate::types::{PriceQuoteSet, SearchResult};

use super::fast::{self, FastOutcome};
use super::semantic::{self, SemanticOutcome};

/// Which extraction strategy produced the candidates.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The deterministic pattern extractor was confident.
    Fast(FastOutcome),
    /// The fast path declined; the generative oracle was consulted.
    Semantic(SemanticOutcome),
}

/// Run the two-tier extraction strategy and report which tier answered.
pub async fn extract_outcome(
    results: &[SearchResult],
    item: &str,
    chat: Option<&dyn ChatClient>,
    config: &LookupConfig,
) -> ExtractionOutcome {
    let fast = fast::extract(results, config);
    if fast.confident {
        tracing::debug!(candidates = fast.candidates.len(), "fast path selected");
        return ExtractionOutcome::Fast(fast);
    }

    match chat {
        Some(chat) => {
            tracing::debug!("fast path not confident, delegating to oracle");
            ExtractionOutcome::Semantic(semantic::extract(chat, results, item, config).await)
        }
        None => ExtractionOutcome::Semantic(SemanticOutcome::unavailable()),
    }
}

/// Resolve adapted results into a deduplicated quote set.
///
/// Returns `None` when neither strategy yields a surviving candidate.
pub async fn resolve(
    results: &[SearchResult],
    item: &str,
    chat: Option<&dyn ChatClient>,
    config: &LookupConfig,
) -> Option<PriceQuoteSet> {
    let outcome = extract_outcome(results, item, chat, config).await;

    let candidates = match outcome {
        ExtractionOutcome::Fast(fast) => fast.candidates,
        ExtractionOutcome::Semantic(semantic) if semantic.success => semantic.candidates,
        ExtractionOutcome::Semantic(semantic) => {
            if let Some(reason) = &semantic.reason {
                tracing::warn!(reason = %reason, "semantic extraction unusable");
            }
            Vec::new()
        }
    };

    let mut quotes = PriceQuoteSet::new();
    for candidate in candidates {
        quotes.insert(candidate);
    }

    if quotes.is_empty() {
        None
    } else {
        Some(quotes)
    }
}
