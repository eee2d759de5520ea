//! Delegated price extraction via the generative-text collaborator.
//!
//! Invoked only when the fast path lacks confidence. The oracle is
//! untrusted: its reply is size-bounded, the JSON object is located
//! defensively (the model may wrap it in commentary), the schema is
//! validated, and every claimed source URL is checked against the text the
//! oracle was actually shown. A price is never discarded solely because its
//! provenance cannot be verified, but provenance is never trusted blindly
//! either.
//!
//! Every failure mode (transport, deadline, malformed reply) resolves to
//! `success: false`; nothing here propagates an error.

use std::time::Duration;

use serde::Deserialize;

use crate::config::LookupConfig;
use crate::llm::ChatClient;
use crate::types::{domain_of, PriceCandidate, SearchResult};

const SYSTEM_PROMPT: &str = "\
You extract product prices from web search results.

Rules:
- Report each price in its original currency only; never convert between currencies.
- Parse decimals correctly: \"$249.99\" is 249 USD, never 24900 or 24999.
- Only include prices for the item named by the user.
- Respond with exactly one JSON object and nothing else, in this shape:
  {\"prices\": [{\"price\": <integer>, \"currency\": \"<ISO code>\", \"source\": \"<page title>\", \"url\": \"<page url>\"}]}
- If no price for the item is present, respond with {\"prices\": []}.";

/// Outcome of the semantic extraction pass.
#[derive(Debug, Clone)]
pub struct SemanticOutcome {
    /// True when the oracle answered with schema-valid content in time.
    pub success: bool,
    /// Validated candidates (possibly empty even on success).
    pub candidates: Vec<PriceCandidate>,
    /// Failure description for observability; `None` on success.
    pub reason: Option<String>,
}

impl SemanticOutcome {
    fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            candidates: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    /// Outcome used when no oracle is configured at all.
    pub(crate) fn unavailable() -> Self {
        Self::failed("no extraction oracle configured")
    }
}

/// What the oracle is asked to return.
#[derive(Debug, Deserialize)]
struct OracleReply {
    prices: Vec<OraclePrice>,
}

#[derive(Debug, Deserialize)]
struct OraclePrice {
    price: u64,
    currency: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
}

/// Ask the oracle for prices in the adapted results.
pub async fn extract(
    chat: &dyn ChatClient,
    results: &[SearchResult],
    item: &str,
    config: &LookupConfig,
) -> SemanticOutcome {
    let adapted_text = render_results(results);
    let user_prompt = format!("Item: {item}\n\nSearch results:\n{adapted_text}");

    let deadline = Duration::from_secs(config.extract_timeout_seconds);
    let reply = match tokio::time::timeout(deadline, chat.complete(SYSTEM_PROMPT, &user_prompt))
        .await
    {
        Ok(Ok(reply)) => reply,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "semantic extraction call failed");
            return SemanticOutcome::failed(format!("oracle call failed: {err}"));
        }
        Err(_) => {
            tracing::warn!(
                timeout_seconds = config.extract_timeout_seconds,
                "semantic extraction deadline exceeded"
            );
            return SemanticOutcome::failed("oracle deadline exceeded");
        }
    };

    if reply.len() > config.max_oracle_response_bytes {
        return SemanticOutcome::failed(format!(
            "oracle response too large: {} bytes",
            reply.len()
        ));
    }

    let Some(json) = locate_json(&reply) else {
        return SemanticOutcome::failed("oracle response contains no JSON object");
    };

    let parsed: OracleReply = match serde_json::from_str(json) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "oracle reply failed schema validation");
            return SemanticOutcome::failed(format!("schema violation: {err}"));
        }
    };

    let candidates = validate_candidates(parsed.prices, results, &adapted_text, config);
    tracing::debug!(candidates = candidates.len(), "semantic extraction finished");

    SemanticOutcome {
        success: true,
        candidates,
        reason: None,
    }
}

/// The redirect-resolved text the oracle is shown.
fn render_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n{}\n{}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Locate one JSON object in free text: first `{` to last `}`.
///
/// The oracle may prepend commentary or reasoning markup; everything
/// outside the outermost braces is ignored.
fn locate_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Apply the plausibility floor and provenance validation.
fn validate_candidates(
    prices: Vec<OraclePrice>,
    results: &[SearchResult],
    adapted_text: &str,
    config: &LookupConfig,
) -> Vec<PriceCandidate> {
    let mut candidates = Vec::new();

    for price in prices {
        let currency = normalize_currency(&price.currency);
        if price.price < config.floor_for(&currency) {
            tracing::trace!(amount = price.price, %currency, "oracle amount below floor");
            continue;
        }

        let (source_url, source_title, url_unverified) =
            verify_provenance(&price.url, &price.source, results, adapted_text);

        let mut source_domain = domain_of(&source_url);
        if source_domain.is_empty() {
            source_domain = "unknown".to_string();
        }

        if url_unverified {
            tracing::debug!(url = %source_url, "oracle provenance unverified");
        }

        candidates.push(PriceCandidate {
            amount: price.price,
            currency,
            source_title,
            source_url,
            source_domain,
            url_unverified,
        });
    }

    candidates
}

fn normalize_currency(code: &str) -> String {
    match code.trim().to_uppercase().as_str() {
        "RP" => "IDR".to_string(),
        other => other.to_string(),
    }
}

/// Check a claimed URL against the text the oracle was shown.
///
/// Verbatim occurrence verifies it. Otherwise a same-domain URL from the
/// results substitutes for it. Failing both, the claim is kept but flagged.
fn verify_provenance(
    claimed_url: &str,
    claimed_source: &str,
    results: &[SearchResult],
    adapted_text: &str,
) -> (String, String, bool) {
    let title_for = |url: &str| {
        results
            .iter()
            .find(|r| r.url == url)
            .map(|r| r.title.clone())
            .unwrap_or_else(|| claimed_source.to_string())
    };

    if !claimed_url.is_empty() && adapted_text.contains(claimed_url) {
        return (claimed_url.to_string(), title_for(claimed_url), false);
    }

    let claimed_domain = domain_of(claimed_url);
    if !claimed_domain.is_empty() {
        if let Some(substitute) = results.iter().find(|r| domain_of(&r.url) == claimed_domain) {
            return (substitute.url.clone(), substitute.title.clone(), false);
        }
    }

    // No URL at all: fall back to matching the claimed source title.
    if claimed_url.is_empty() {
        if let Some(matched) = results.iter().find(|r| r.title == claimed_source) {
            return (matched.url.clone(), matched.title.clone(), false);
        }
    }

    (claimed_url.to_string(), claimed_source.to_string(), true)
}
