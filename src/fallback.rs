//! Static price estimates for when live search is unavailable or inconclusive.
//!
//! A fixed keyword → range table (rupiah), initialised once and immutable
//! thereafter. Lookup is a case-insensitive substring match in both
//! directions, so "macbook pro m3" finds the "macbook" entry and "lap"
//! finds "laptop". First hit in table order wins.

use once_cell::sync::Lazy;

use crate::types::PriceRange;

/// Currency of every estimate in the table.
pub const ESTIMATE_CURRENCY: &str = "IDR";

static ESTIMATES: Lazy<Vec<(&'static str, PriceRange)>> = Lazy::new(|| {
    vec![
        // Electronics
        ("laptop", range(3_000_000, 25_000_000, 8_000_000)),
        ("iphone", range(8_000_000, 25_000_000, 15_000_000)),
        ("ps5", range(7_000_000, 9_000_000, 8_000_000)),
        ("samsung", range(2_000_000, 20_000_000, 7_000_000)),
        ("macbook", range(12_000_000, 35_000_000, 20_000_000)),
        // Common items
        ("sepatu", range(200_000, 3_000_000, 500_000)),
        ("baju", range(50_000, 1_000_000, 200_000)),
        ("tas", range(100_000, 5_000_000, 500_000)),
        ("jam", range(150_000, 10_000_000, 1_000_000)),
        ("headphone", range(100_000, 5_000_000, 800_000)),
    ]
});

const fn range(min: u64, max: u64, avg: u64) -> PriceRange {
    PriceRange { min, max, avg }
}

/// Look `item` up against the static table.
///
/// Returns the matched keyword and its range, or `None` when nothing in the
/// table relates to the item.
pub fn lookup(item: &str) -> Option<(&'static str, PriceRange)> {
    let needle = item.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    ESTIMATES
        .iter()
        .find(|(keyword, _)| needle.contains(keyword) || keyword.contains(needle.as_str()))
        .map(|(keyword, estimate)| (*keyword, *estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laptop_estimate_matches_table() {
        let (keyword, estimate) = lookup("laptop").expect("laptop is in the table");
        assert_eq!(keyword, "laptop");
        assert_eq!(estimate.min, 3_000_000);
        assert_eq!(estimate.max, 25_000_000);
        assert_eq!(estimate.avg, 8_000_000);
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(lookup("MacBook Pro").is_some());
        assert!(lookup("IPHONE").is_some());
    }

    #[test]
    fn keyword_inside_item_matches() {
        let (keyword, _) = lookup("macbook pro m3 14 inch").expect("contains macbook");
        assert_eq!(keyword, "macbook");
    }

    #[test]
    fn item_inside_keyword_matches() {
        // A partial item name still finds the broader keyword.
        let (keyword, _) = lookup("lap").expect("lap is a prefix of laptop");
        assert_eq!(keyword, "laptop");
    }

    #[test]
    fn unknown_item_misses() {
        assert!(lookup("zeppelin ticket").is_none());
    }

    #[test]
    fn empty_item_misses() {
        assert!(lookup("").is_none());
        assert!(lookup("   ").is_none());
    }

    #[test]
    fn first_table_hit_wins() {
        // "jam tangan samsung" matches both "samsung" and "jam"; table order
        // puts "samsung" first.
        let (keyword, _) = lookup("jam tangan samsung").expect("matches");
        assert_eq!(keyword, "samsung");
    }
}
