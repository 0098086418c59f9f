//! Live exchange-rate retrieval

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use super::config::CurrencyConfig;

/// Source of a fresh GBP-based exchange rate
#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_live_rate(&self) -> Result<f64, FetchError>;
}

/// Response body of the exchange-rate endpoint
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Fetches the rate over HTTP
#[derive(Debug, Clone)]
pub struct HttpRateFetcher {
    client: reqwest::Client,
    endpoint: String,
    target_currency: String,
}

impl HttpRateFetcher {
    pub fn new(config: &CurrencyConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            target_currency: config.target_currency.clone(),
        })
    }

    /// Extract the target currency's rate from a response body
    fn parse_response(&self, body: &str) -> Result<f64, FetchError> {
        let latest: LatestRates = serde_json::from_str(body)?;
        let rate = latest
            .rates
            .get(&self.target_currency)
            .copied()
            .ok_or_else(|| FetchError::MissingCurrency(self.target_currency.clone()))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(FetchError::InvalidRate(rate));
        }
        Ok(rate)
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch_live_rate(&self) -> Result<f64, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        self.parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpRateFetcher {
        HttpRateFetcher::new(&CurrencyConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_usd_rate() {
        let body = r#"{"base":"GBP","date":"2025-03-14","time_last_updated":1741910401,
                       "rates":{"GBP":1,"EUR":1.19,"USD":1.294}}"#;
        assert_eq!(fetcher().parse_response(body).unwrap(), 1.294);
    }

    #[test]
    fn test_missing_currency() {
        let body = r#"{"rates":{"EUR":1.19}}"#;
        assert!(matches!(
            fetcher().parse_response(body),
            Err(FetchError::MissingCurrency(code)) if code == "USD"
        ));
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(matches!(fetcher().parse_response("<html>"), Err(FetchError::Parse(_))));
        assert!(matches!(
            fetcher().parse_response(r#"{"rates":{"USD":0}}"#),
            Err(FetchError::InvalidRate(_))
        ));
    }
}
