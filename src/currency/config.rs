//! Currency cache configuration

use std::path::Path;
use std::time::Duration;

use chrono::NaiveTime;
use serde::Deserialize;

/// Public endpoint quoting rates against GBP
pub const DEFAULT_RATE_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/GBP";

/// Key the persisted record lives under
pub const DEFAULT_STORAGE_KEY: &str = "currency_exchange_rate";

/// GBP to USD rate used when no live or cached rate is obtainable
pub const FALLBACK_RATE: f64 = 1.27;

/// Settings for the currency rate cache
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyConfig {
    /// Exchange-rate endpoint returning `{"rates": {...}}`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Currency code read from the response
    #[serde(default = "default_target_currency")]
    pub target_currency: String,

    /// Key of the persisted record
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Rate used when nothing else is available
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,

    /// Local time of day the daily refresh runs
    #[serde(default = "default_refresh_at")]
    pub refresh_at: NaiveTime,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String { DEFAULT_RATE_ENDPOINT.to_string() }
fn default_target_currency() -> String { "USD".to_string() }
fn default_storage_key() -> String { DEFAULT_STORAGE_KEY.to_string() }
fn default_fallback_rate() -> f64 { FALLBACK_RATE }
fn default_refresh_at() -> NaiveTime { NaiveTime::from_hms_opt(0, 1, 0).unwrap_or(NaiveTime::MIN) }
fn default_request_timeout_secs() -> u64 { 10 }

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            target_currency: default_target_currency(),
            storage_key: default_storage_key(),
            fallback_rate: default_fallback_rate(),
            refresh_at: default_refresh_at(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CurrencyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config: CurrencyConfig = serde_json::from_str(&text)?;
        if !(config.fallback_rate.is_finite() && config.fallback_rate > 0.0) {
            return Err(format!("fallback_rate must be positive, got {}", config.fallback_rate).into());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CurrencyConfig::default();
        assert_eq!(config.fallback_rate, 1.27);
        assert_eq!(config.storage_key, "currency_exchange_rate");
        assert_eq!(config.refresh_at, NaiveTime::from_hms_opt(0, 1, 0).unwrap());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fallback_rate": 1.3, "refresh_at": "02:30:00"}}"#).unwrap();

        let config = CurrencyConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.fallback_rate, 1.3);
        assert_eq!(config.refresh_at, NaiveTime::from_hms_opt(2, 30, 0).unwrap());
        assert_eq!(config.endpoint, DEFAULT_RATE_ENDPOINT);
    }

    #[test]
    fn test_rejects_non_positive_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fallback_rate": 0.0}}"#).unwrap();
        assert!(CurrencyConfig::from_json_path(file.path()).is_err());
    }
}
