//! Order book configuration

use log::info;
use offerbook_core::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::ordering::OfferOrdering;

/// Environment variable overriding `default_currency`
pub const ENV_DEFAULT_CURRENCY: &str = "OFFERBOOK_DEFAULT_CURRENCY";
/// Environment variable overriding `ordering`
pub const ENV_ORDERING: &str = "OFFERBOOK_ORDERING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookConfig {
    /// Currency requested by `load_offers` when no bank account is selected
    pub default_currency: CurrencyCode,
    /// Comparator of the sorted view
    pub ordering: OfferOrdering,
    /// Capacity of feed channels created on behalf of the order book
    pub feed_buffer: usize,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            default_currency: "EUR".to_string(),
            ordering: OfferOrdering::PriceAscending,
            feed_buffer: 1000,
        }
    }
}

impl OrderBookConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `OFFERBOOK_*` environment overrides
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(currency) = lookup(ENV_DEFAULT_CURRENCY) {
            let currency = currency.trim().to_ascii_uppercase();
            if currency.is_empty() {
                return Err(ConfigError::Parse(format!("{} is empty", ENV_DEFAULT_CURRENCY)));
            }
            info!("Default currency overridden to {}", currency);
            self.default_currency = currency;
        }
        if let Some(ordering) = lookup(ENV_ORDERING) {
            self.ordering = ordering.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = OrderBookConfig::default();
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.ordering, OfferOrdering::PriceAscending);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OrderBookConfig::from_json(r#"{"ordering": "amount-desc"}"#).unwrap();
        assert_eq!(config.ordering, OfferOrdering::AmountDescending);
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.feed_buffer, 1000);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            OrderBookConfig::from_json(r#"{"ordering": "sideways"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            OrderBookConfig::from_file("/nonexistent/offerbook.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_DEFAULT_CURRENCY, "usd"), (ENV_ORDERING, "price-desc")]);
        let config = OrderBookConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.ordering, OfferOrdering::PriceDescending);
    }

    #[test]
    fn test_bad_override_rejected() {
        let result = OrderBookConfig::default()
            .apply_overrides(|key| (key == ENV_ORDERING).then(|| "random".to_string()));
        assert!(result.is_err());
    }
}
