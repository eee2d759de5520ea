//! Deterministic, pattern-based price extraction.
//!
//! Scans result content for currency-tagged numbers: a currency marker
//! (`Rp`, `IDR`, `$`, `US$`, `USD`), grouped digits, an optional decimal
//! tail, and an optional Indonesian magnitude word (`juta`, `jt`, `ribu`,
//! `rb`). Grouping punctuation is normalised away and magnitude words are
//! folded into the integer amount.
//!
//! The decimal tail is minor units and is truncated, never concatenated:
//! `$249.99` yields 249, not 24999. With a magnitude word the tail scales
//! instead (`Rp 1.2 juta` → 1 200 000).
//!
//! Confidence is precision-over-recall: one match below its currency's
//! plausibility floor disqualifies the whole fast path for the call, since
//! a wrong silent price is costlier than an escalation to the semantic path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LookupConfig;
use crate::types::{PriceCandidate, SearchResult};

static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(Rp\.?|IDR|US\$|USD|\$)\s*([0-9]{1,3}(?:[.,][0-9]{3})+|[0-9]+)(?:[.,]([0-9]{1,2}))?(?:\s*(juta|jt|ribu|rb))?",
    )
    .expect("price pattern regex")
});

/// Outcome of the fast extraction pass.
#[derive(Debug, Clone)]
pub struct FastOutcome {
    /// True when at least one amount matched and every match cleared its
    /// currency's plausibility floor.
    pub confident: bool,
    /// The plausible candidates, in provider rank order.
    pub candidates: Vec<PriceCandidate>,
}

/// Run the deterministic extractor over each result's content.
pub fn extract(results: &[SearchResult], config: &LookupConfig) -> FastOutcome {
    let mut candidates = Vec::new();
    let mut matched_any = false;
    let mut all_plausible = true;

    for result in results {
        for caps in PRICE_RE.captures_iter(&result.content) {
            matched_any = true;

            let currency = currency_of(&caps[1]);
            let Some(amount) = normalize_amount(
                &caps[2],
                caps.get(3).map(|m| m.as_str()),
                caps.get(4).map(|m| m.as_str()),
            ) else {
                all_plausible = false;
                continue;
            };

            if amount < config.floor_for(&currency) {
                tracing::trace!(amount, %currency, "amount below plausibility floor");
                all_plausible = false;
                continue;
            }

            candidates.push(PriceCandidate::from_result(amount, currency, result));
        }
    }

    let confident = matched_any && all_plausible;
    tracing::debug!(
        confident,
        candidates = candidates.len(),
        "fast extraction finished"
    );
    FastOutcome {
        confident,
        candidates,
    }
}

/// Map a matched currency tag to its ISO code.
fn currency_of(tag: &str) -> String {
    match tag.trim_end_matches('.').to_uppercase().as_str() {
        "RP" | "IDR" => "IDR".to_string(),
        _ => "USD".to_string(),
    }
}

/// Fold grouped digits, decimal tail, and magnitude word into an integer.
///
/// `None` on overflow or unparseable digits; the caller treats that as an
/// implausible match.
fn normalize_amount(grouped: &str, decimal: Option<&str>, suffix: Option<&str>) -> Option<u64> {
    let digits: String = grouped.chars().filter(char::is_ascii_digit).collect();
    let base: u64 = digits.parse().ok()?;

    let multiplier: u64 = match suffix.map(str::to_lowercase).as_deref() {
        Some("juta") | Some("jt") => 1_000_000,
        Some("ribu") | Some("rb") => 1_000,
        _ => 1,
    };

    let mut amount = base.checked_mul(multiplier)?;

    if let (Some(decimal), true) = (decimal, multiplier > 1) {
        // "1.2 juta": the tail is a fraction of the magnitude word.
        let fraction: u64 = decimal.parse().ok()?;
        let scale = multiplier / 10u64.checked_pow(decimal.len() as u32)?;
        amount = amount.checked_add(fraction.checked_mul(scale)?)?;
    }

    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(domain_tag: usize, content: &str) -> SearchResult {
        SearchResult {
            title: format!("Listing {domain_tag}"),
            url: format!("https://shop{domain_tag}.example.com/p"),
            content: content.to_string(),
        }
    }

    fn config() -> LookupConfig {
        LookupConfig::default()
    }

    #[test]
    fn grouped_rupiah_amounts_extracted_confidently() {
        let results = vec![
            result(1, "Harga mulai Rp25.999.000 untuk varian 256GB."),
            result(2, "Dijual Rp26.999.000 di toko resmi."),
            result(3, "Dibanderol Rp27.499.000 minggu ini."),
        ];
        let outcome = extract(&results, &config());
        assert!(outcome.confident);
        let amounts: Vec<u64> = outcome.candidates.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![25_999_000, 26_999_000, 27_499_000]);
        assert!(outcome.candidates.iter().all(|c| c.currency == "IDR"));
    }

    #[test]
    fn dollar_decimal_truncated_not_concatenated() {
        let results = vec![result(1, "On sale for $249.99 this week only")];
        let outcome = extract(&results, &config());
        assert!(outcome.confident);
        assert_eq!(outcome.candidates.len(), 1);
        let candidate = &outcome.candidates[0];
        assert_eq!(candidate.amount, 249);
        assert_ne!(candidate.amount, 24_999);
        assert_ne!(candidate.amount, 24_900);
        assert_eq!(candidate.currency, "USD");
    }

    #[test]
    fn magnitude_words_scale_the_amount() {
        let cases = [
            ("Rp 25 juta", 25_000_000),
            ("Rp25jt", 25_000_000),
            ("Rp 500 ribu", 500_000),
            ("Rp750rb", 750_000),
            ("mulai Rp 25 Jutaan", 25_000_000),
        ];
        for (content, expected) in cases {
            let outcome = extract(&[result(1, content)], &config());
            assert!(outcome.confident, "not confident for {content:?}");
            assert_eq!(outcome.candidates[0].amount, expected, "for {content:?}");
        }
    }

    #[test]
    fn decimal_with_magnitude_word_scales_fractionally() {
        let outcome = extract(&[result(1, "sekitar Rp 1.2 juta saja")], &config());
        assert!(outcome.confident);
        assert_eq!(outcome.candidates[0].amount, 1_200_000);
    }

    #[test]
    fn comma_grouped_dollars() {
        let outcome = extract(&[result(1, "listed at USD 1,299 new")], &config());
        assert!(outcome.confident);
        assert_eq!(outcome.candidates[0].amount, 1_299);
        assert_eq!(outcome.candidates[0].currency, "USD");
    }

    #[test]
    fn one_implausible_match_disqualifies_the_call() {
        let results = vec![
            result(1, "Harga Rp25.999.000 terbaru"),
            result(2, "Ongkir mulai Rp5.000 ke seluruh Indonesia"),
        ];
        let outcome = extract(&results, &config());
        assert!(!outcome.confident);
        // The plausible candidate is still reported, just not trusted alone.
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].amount, 25_999_000);
    }

    #[test]
    fn no_match_is_not_confident() {
        let outcome = extract(&[result(1, "no prices mentioned here at all")], &config());
        assert!(!outcome.confident);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn small_dollar_amounts_clear_the_usd_floor() {
        let outcome = extract(&[result(1, "a used one goes for $5")], &config());
        assert!(outcome.confident);
        assert_eq!(outcome.candidates[0].amount, 5);
    }

    #[test]
    fn multiple_amounts_in_one_result_all_captured() {
        let outcome = extract(
            &[result(1, "256GB Rp25.999.000, 512GB Rp29.999.000")],
            &config(),
        );
        assert!(outcome.confident);
        assert_eq!(outcome.candidates.len(), 2);
    }

    #[test]
    fn title_is_not_scanned() {
        let r = SearchResult {
            title: "Promo Rp10.000.000".into(),
            url: "https://shop.example.com/p".into(),
            content: "no amounts in the body".into(),
        };
        let outcome = extract(&[r], &config());
        assert!(!outcome.confident);
        assert!(outcome.candidates.is_empty());
    }
}
