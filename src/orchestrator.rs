//! Deadline-bounded price lookup orchestration.
//!
//! # Pipeline
//!
//! `Searching → Extracting → Done`, with a fallback branch reachable from
//! both working states:
//!
//! 1. Query the search collaborator with `"{item} price"` under a deadline
//! 2. Adapt the raw response into bounded [`SearchResult`]s
//! 3. Resolve candidates through the extraction coordinator
//! 4. Format the top sources (ascending price) into a [`PriceReport`]
//!
//! Any failure (no provider configured, transport error, deadline overrun,
//! or no surviving candidate) resolves to the static estimate table and,
//! failing that, a structured "not found" report. No error and no panic
//! escapes [`PriceLookup::lookup`]; a failed lookup never affects later,
//! independent lookups.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter;
use crate::config::LookupConfig;
use crate::error::Result;
use crate::extract::coordinator;
use crate::fallback::{self, ESTIMATE_CURRENCY};
use crate::llm::ChatClient;
use crate::provider::SearchProvider;
use crate::types::{PriceQuoteSet, PriceRange, PriceReport, PriceSource};

/// Why a lookup left the live-search path.
///
/// "Searched but found no price" and "search unavailable" are distinct for
/// observability; downstream behaviour is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No search collaborator was configured.
    SearchNotConfigured,
    /// The search collaborator returned an error.
    SearchFailed,
    /// The search call outlived its deadline and was abandoned.
    DeadlineExceeded,
    /// Search worked but no plausible candidate survived extraction.
    NoPriceFound,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SearchNotConfigured => "search not configured",
            Self::SearchFailed => "search failed",
            Self::DeadlineExceeded => "search deadline exceeded",
            Self::NoPriceFound => "no price found",
        };
        f.write_str(text)
    }
}

/// The price lookup entry point.
///
/// Holds the two optional collaborators behind trait objects so callers and
/// tests can inject anything satisfying the seams. One value serves many
/// lookups; each lookup is independent and shares no mutable state.
pub struct PriceLookup {
    search: Option<Arc<dyn SearchProvider>>,
    chat: Option<Arc<dyn ChatClient>>,
    config: LookupConfig,
}

impl fmt::Debug for PriceLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceLookup")
            .field("search", &self.search.is_some())
            .field("chat", &self.chat.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PriceLookup {
    /// Create a lookup with no collaborators: every query resolves through
    /// the static estimate table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PriceSearchError::Config`] when `config` is invalid.
    pub fn new(config: LookupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            search: None,
            chat: None,
            config,
        })
    }

    /// Attach the web search collaborator.
    #[must_use]
    pub fn with_search(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    /// Attach the generative extraction collaborator.
    #[must_use]
    pub fn with_chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Look up a current market price for `item`.
    ///
    /// Always returns a report; never an error, never a hang past the
    /// configured deadlines.
    pub async fn lookup(&self, item: &str) -> PriceReport {
        tracing::trace!(item, "price lookup started");

        let Some(provider) = &self.search else {
            return self.fall_back(item, FallbackReason::SearchNotConfigured);
        };

        // Searching
        let query = format!("{item} price");
        let deadline = Duration::from_secs(self.config.search_timeout_seconds);
        let search_call = provider.search(
            &query,
            self.config.result_limit,
            self.config.include_full_content,
        );

        let raw = match tokio::time::timeout(deadline, search_call).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "search capability failed");
                return self.fall_back(item, FallbackReason::SearchFailed);
            }
            Err(_) => {
                // The in-flight call is dropped here; any late result is
                // discarded, never awaited further.
                tracing::warn!(
                    timeout_seconds = self.config.search_timeout_seconds,
                    "search deadline exceeded, abandoning call"
                );
                return self.fall_back(item, FallbackReason::DeadlineExceeded);
            }
        };

        // Extracting
        let results = adapter::adapt(&raw, self.config.result_limit, self.config.max_content_chars);
        if results.is_empty() {
            return self.fall_back(item, FallbackReason::NoPriceFound);
        }

        match coordinator::resolve(&results, item, self.chat.as_deref(), &self.config).await {
            Some(quotes) => self.done(item, &quotes),
            None => self.fall_back(item, FallbackReason::NoPriceFound),
        }
    }

    /// Synchronous bridge for callers without a cooperative scheduler.
    ///
    /// Spins up a dedicated runtime, runs the lookup on it, and tears the
    /// runtime down afterwards. Never re-enters an already-busy scheduler.
    pub fn lookup_blocking(&self, item: &str) -> PriceReport {
        match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.lookup(item)),
            Err(err) => {
                tracing::warn!(error = %err, "worker pool unavailable, using static estimates");
                self.fall_back(item, FallbackReason::SearchFailed)
            }
        }
    }

    /// Done state: format the surviving quotes into the result contract.
    fn done(&self, item: &str, quotes: &PriceQuoteSet) -> PriceReport {
        let price_range = quotes.ranges();
        let sources: Vec<PriceSource> = quotes
            .candidates_by_price()
            .into_iter()
            .take(self.config.max_sources)
            .map(|c| PriceSource {
                price: c.amount,
                currency: c.currency.clone(),
                url: c.source_url.clone(),
                title: c.source_title.clone(),
            })
            .collect();

        tracing::debug!(
            item,
            samples = quotes.len(),
            currencies = price_range.len(),
            "price lookup done"
        );

        let message = found_message(item, &price_range, &sources);
        PriceReport {
            success: true,
            item: item.to_string(),
            price_range,
            sample_count: quotes.len(),
            sources,
            message,
        }
    }

    /// Fallback state: static table first, structured not-found otherwise.
    fn fall_back(&self, item: &str, reason: FallbackReason) -> PriceReport {
        tracing::debug!(item, %reason, "falling back to static estimates");

        match fallback::lookup(item) {
            Some((keyword, estimate)) => {
                tracing::debug!(keyword, "static estimate matched");
                PriceReport {
                    success: true,
                    item: item.to_string(),
                    price_range: BTreeMap::from([(ESTIMATE_CURRENCY.to_string(), estimate)]),
                    sample_count: 0,
                    sources: Vec::new(),
                    message: estimate_message(item, &estimate),
                }
            }
            None => PriceReport {
                success: false,
                item: item.to_string(),
                price_range: BTreeMap::new(),
                sample_count: 0,
                sources: Vec::new(),
                message: not_found_message(item),
            },
        }
    }
}

/// `25999000` → `"25,999,000"`.
fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Price with its customary currency marker (`Rp 25,999,000`, `USD 249`).
fn format_price(currency: &str, amount: u64) -> String {
    if currency == "IDR" {
        format!("Rp {}", format_amount(amount))
    } else {
        format!("{currency} {}", format_amount(amount))
    }
}

fn found_message(
    item: &str,
    ranges: &BTreeMap<String, PriceRange>,
    sources: &[PriceSource],
) -> String {
    let mut message = format!("🔍 Hasil pencarian harga untuk '{item}':\n");

    for (currency, range) in ranges {
        if ranges.len() > 1 {
            message.push_str(&format!("💱 {currency}:\n"));
        }
        message.push_str(&format!(
            "  • Harga terendah: {}\n",
            format_price(currency, range.min)
        ));
        message.push_str(&format!(
            "  • Harga tertinggi: {}\n",
            format_price(currency, range.max)
        ));
        message.push_str(&format!(
            "  • Harga rata-rata: {}\n",
            format_price(currency, range.avg)
        ));
    }

    if !sources.is_empty() {
        message.push_str(&format!("\n📌 Sumber ({}):\n", sources.len()));
        for (i, source) in sources.iter().enumerate() {
            message.push_str(&format!(
                "  {}. {} — {}\n     {}\n",
                i + 1,
                format_price(&source.currency, source.price),
                source.title,
                source.url
            ));
        }
    }

    message.push_str("\n💡 Harga bisa bervariasi tergantung spesifikasi dan toko");
    message
}

fn estimate_message(item: &str, estimate: &PriceRange) -> String {
    format!(
        "🔍 Hasil pencarian harga untuk '{item}':\n  \
         • Harga terendah: Rp {}\n  \
         • Harga tertinggi: Rp {}\n  \
         • Harga rata-rata: Rp {}\n\n\
         💡 Harga bisa bervariasi tergantung spesifikasi dan toko",
        format_amount(estimate.min),
        format_amount(estimate.max),
        format_amount(estimate.avg),
    )
}

fn not_found_message(item: &str) -> String {
    format!(
        "🔍 Maaf, tidak menemukan informasi harga untuk '{item}'.\n\
         Coba sebutkan item dengan lebih spesifik (contoh: 'laptop', 'iPhone', 'PS5')"
    )
}
