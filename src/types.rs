//! Core types for price discovery: search results, extracted candidates,
//! the deduplicated quote set, and the caller-facing report contract.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use url::Url;

/// A single result from the web search collaborator, after adaptation.
///
/// Order within a batch is provider rank; nothing downstream depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The result URL, already redirect-resolved.
    pub url: String,
    /// Captured page content (description and/or full text), length-capped.
    pub content: String,
}

/// One extracted (amount, currency, source) triple before deduplication.
///
/// `amount` is an integer in the currency's customary quoting unit
/// (whole rupiah for IDR, whole dollars for USD); candidates below the
/// per-currency plausibility floor are rejected at extraction time and
/// never reach a [`PriceQuoteSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCandidate {
    pub amount: u64,
    pub currency: String,
    pub source_title: String,
    pub source_url: String,
    pub source_domain: String,
    /// True when the extraction oracle named a URL that does not occur in
    /// the source text and no same-domain substitute was found.
    #[serde(default)]
    pub url_unverified: bool,
}

impl PriceCandidate {
    /// Build a candidate from an amount found in `source`'s content.
    pub fn from_result(amount: u64, currency: impl Into<String>, source: &SearchResult) -> Self {
        Self {
            amount,
            currency: currency.into(),
            source_title: source.title.clone(),
            source_url: source.url.clone(),
            source_domain: domain_of(&source.url),
            url_unverified: false,
        }
    }
}

/// A per-currency price summary. `avg` is the integer-truncated mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
    pub avg: u64,
}

/// The deduplicated, currency-partitioned candidate collection for one query.
///
/// Holds at most one candidate per `(source_domain, currency)` pair, always
/// the lowest amount observed for that pair. Candidates are never compared
/// or merged across currencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuoteSet {
    quotes: BTreeMap<(String, String), PriceCandidate>,
}

impl PriceQuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a candidate in, keeping the minimum amount per (domain, currency).
    pub fn insert(&mut self, candidate: PriceCandidate) {
        let key = (
            candidate.source_domain.clone(),
            candidate.currency.clone(),
        );
        match self.quotes.entry(key) {
            Entry::Occupied(mut existing) => {
                if candidate.amount < existing.get().amount {
                    existing.insert(candidate);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Surviving candidates in ascending amount order (ties in domain order).
    pub fn candidates_by_price(&self) -> Vec<&PriceCandidate> {
        let mut out: Vec<&PriceCandidate> = self.quotes.values().collect();
        out.sort_by(|a, b| {
            a.amount
                .cmp(&b.amount)
                .then_with(|| a.source_domain.cmp(&b.source_domain))
        });
        out
    }

    /// One [`PriceRange`] per currency, computed over that currency's
    /// survivors only.
    pub fn ranges(&self) -> BTreeMap<String, PriceRange> {
        let mut per_currency: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        for candidate in self.quotes.values() {
            per_currency
                .entry(candidate.currency.clone())
                .or_default()
                .push(candidate.amount);
        }

        per_currency
            .into_iter()
            .map(|(currency, amounts)| {
                let min = amounts.iter().copied().min().unwrap_or(0);
                let max = amounts.iter().copied().max().unwrap_or(0);
                let sum: u128 = amounts.iter().map(|&a| u128::from(a)).sum();
                let avg = (sum / amounts.len() as u128) as u64;
                (currency, PriceRange { min, max, avg })
            })
            .collect()
    }
}

/// One source line in the caller-facing report, ascending-price ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSource {
    pub price: u64,
    pub currency: String,
    pub url: String,
    pub title: String,
}

/// The result contract handed back to the caller.
///
/// Success carries a per-currency range, the surviving sample count, up to
/// five ascending-price sources, and a preformatted user-facing message.
/// Failure carries only the item and the message, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReport {
    pub success: bool,
    pub item: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub price_range: BTreeMap<String, PriceRange>,
    #[serde(default)]
    pub sample_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<PriceSource>,
    pub message: String,
}

/// Registrable domain of a URL, lowercased, with any `www.` prefix dropped.
/// Unparseable URLs yield an empty string.
pub fn domain_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}
