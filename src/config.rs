//! Lookup configuration with sensible defaults.
//!
//! [`LookupConfig`] controls deadlines, result limits, content capping, and
//! the per-currency plausibility floors used to reject garbage amounts.

use std::collections::HashMap;

use crate::error::PriceSearchError;

/// Configuration for a price lookup.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Deadline for the search collaborator call, in seconds.
    pub search_timeout_seconds: u64,
    /// Deadline for the semantic extraction call, in seconds.
    pub extract_timeout_seconds: u64,
    /// How many search results to request and keep (1..=10).
    pub result_limit: usize,
    /// Whether to ask the provider for full page content (slower, richer).
    pub include_full_content: bool,
    /// Cap on captured content per result, in characters (500..=3000).
    /// Bounds downstream extraction cost.
    pub max_content_chars: usize,
    /// How many sources to list in a successful report.
    pub max_sources: usize,
    /// Upper bound on the extraction oracle's response body, in bytes.
    /// Larger responses are treated as malformed.
    pub max_oracle_response_bytes: usize,
    /// Per-currency plausibility floors: an extracted amount below its
    /// currency's floor rejects the candidate. Currencies absent from the
    /// map get a floor of 1.
    pub floors: HashMap<String, u64>,
    /// Custom User-Agent for collaborator requests.
    pub user_agent: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_timeout_seconds: 20,
            extract_timeout_seconds: 20,
            result_limit: 5,
            include_full_content: true,
            max_content_chars: 2000,
            max_sources: 5,
            max_oracle_response_bytes: 64 * 1024,
            floors: HashMap::from([("IDR".to_string(), 10_000), ("USD".to_string(), 1)]),
            user_agent: None,
        }
    }
}

impl LookupConfig {
    /// The plausibility floor for `currency` (1 when not configured).
    pub fn floor_for(&self, currency: &str) -> u64 {
        self.floors.get(currency).copied().unwrap_or(1)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both timeouts must be greater than 0
    /// - `result_limit` must be within 1..=10
    /// - `max_content_chars` must be within 500..=3000
    /// - `max_sources` and `max_oracle_response_bytes` must be greater than 0
    pub fn validate(&self) -> Result<(), PriceSearchError> {
        if self.search_timeout_seconds == 0 {
            return Err(PriceSearchError::Config(
                "search_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.extract_timeout_seconds == 0 {
            return Err(PriceSearchError::Config(
                "extract_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.result_limit == 0 || self.result_limit > 10 {
            return Err(PriceSearchError::Config(
                "result_limit must be within 1..=10".into(),
            ));
        }
        if !(500..=3000).contains(&self.max_content_chars) {
            return Err(PriceSearchError::Config(
                "max_content_chars must be within 500..=3000".into(),
            ));
        }
        if self.max_sources == 0 {
            return Err(PriceSearchError::Config(
                "max_sources must be greater than 0".into(),
            ));
        }
        if self.max_oracle_response_bytes == 0 {
            return Err(PriceSearchError::Config(
                "max_oracle_response_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = LookupConfig::default();
        assert_eq!(config.search_timeout_seconds, 20);
        assert_eq!(config.extract_timeout_seconds, 20);
        assert_eq!(config.result_limit, 5);
        assert!(config.include_full_content);
        assert_eq!(config.max_content_chars, 2000);
        assert_eq!(config.max_sources, 5);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn default_floors_cover_idr_and_usd() {
        let config = LookupConfig::default();
        assert_eq!(config.floor_for("IDR"), 10_000);
        assert_eq!(config.floor_for("USD"), 1);
    }

    #[test]
    fn unknown_currency_floor_is_one() {
        let config = LookupConfig::default();
        assert_eq!(config.floor_for("JPY"), 1);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(LookupConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_search_timeout_rejected() {
        let config = LookupConfig {
            search_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search_timeout_seconds"));
    }

    #[test]
    fn zero_extract_timeout_rejected() {
        let config = LookupConfig {
            extract_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extract_timeout_seconds"));
    }

    #[test]
    fn result_limit_out_of_range_rejected() {
        for limit in [0usize, 11] {
            let config = LookupConfig {
                result_limit: limit,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("result_limit"));
        }
    }

    #[test]
    fn content_cap_out_of_range_rejected() {
        for chars in [0usize, 499, 3001] {
            let config = LookupConfig {
                max_content_chars: chars,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("max_content_chars"));
        }
    }

    #[test]
    fn content_cap_bounds_accepted() {
        for chars in [500usize, 3000] {
            let config = LookupConfig {
                max_content_chars: chars,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn zero_max_sources_rejected() {
        let config = LookupConfig {
            max_sources: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn custom_floor_overrides_default() {
        let mut config = LookupConfig::default();
        config.floors.insert("IDR".into(), 50_000);
        assert_eq!(config.floor_for("IDR"), 50_000);
    }
}
