//! GBP amounts shown alongside their USD conversion

use super::cache::RateCache;

/// Shown in place of hidden balances
pub const MASKED: &str = "••••••";

/// Format with two decimals and thousands separators, e.g. `1,234.56`
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_gbp(amount: f64) -> String {
    format!("£{}", format_amount(amount))
}

pub fn format_usd(amount: f64) -> String {
    format!("${}", format_amount(amount))
}

/// The two lines of a converted balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLines {
    pub gbp: String,
    pub usd: String,
}

/// Renders balances with the cache's current rate
pub struct CurrencyDisplay<'a> {
    cache: &'a RateCache,
}

impl<'a> CurrencyDisplay<'a> {
    pub fn new(cache: &'a RateCache) -> Self {
        Self { cache }
    }

    pub fn render(&self, gbp_amount: f64, balance_visible: bool) -> DisplayLines {
        let gbp = if balance_visible { format_gbp(gbp_amount) } else { MASKED.to_string() };

        let usd = match self.cache.snapshot() {
            None => "Loading...".to_string(),
            Some(snapshot) if snapshot.degraded => "Unavailable".to_string(),
            Some(_) if !balance_visible => MASKED.to_string(),
            Some(_) => format_usd(self.cache.convert_to_usd(gbp_amount)),
        };

        DisplayLines { gbp, usd }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{CurrencyConfig, MemoryStore, RateFetcher, SystemClock};
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Fixed(Option<f64>);

    #[async_trait]
    impl RateFetcher for Fixed {
        async fn fetch_live_rate(&self) -> Result<f64, FetchError> {
            self.0.ok_or_else(|| FetchError::RequestFailed("offline".to_string()))
        }
    }

    fn cache(rate: Option<f64>) -> Arc<RateCache> {
        Arc::new(RateCache::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Fixed(rate)),
            Arc::new(SystemClock),
            CurrencyConfig::default(),
        ))
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1_234.567), "1,234.57");
        assert_eq!(format_amount(18_549.28), "18,549.28");
        assert_eq!(format_amount(1_000_000.0), "1,000,000.00");
        assert_eq!(format_amount(-2_500.0), "-2,500.00");
        assert_eq!(format_gbp(42.0), "£42.00");
    }

    #[test]
    fn test_format_non_finite_amount() {
        assert_eq!(format_amount(f64::NAN), "NaN");
        assert_eq!(format_amount(f64::INFINITY), "inf");
        assert_eq!(format_usd(f64::NEG_INFINITY), "$-inf");
    }

    #[tokio::test]
    async fn test_render_states() {
        let cache = cache(Some(1.25));
        let display = CurrencyDisplay::new(&cache);

        let loading = display.render(1_000.0, true);
        assert_eq!(loading.gbp, "£1,000.00");
        assert_eq!(loading.usd, "Loading...");

        cache.init().await;
        assert_eq!(display.render(1_000.0, true).usd, "$1,250.00");

        let hidden = display.render(1_000.0, false);
        assert_eq!(hidden.gbp, MASKED);
        assert_eq!(hidden.usd, MASKED);
    }

    #[tokio::test]
    async fn test_render_degraded_rate() {
        let cache = cache(None);
        cache.init().await;

        let lines = CurrencyDisplay::new(&cache).render(1_000.0, true);
        assert_eq!(lines.usd, "Unavailable");
    }
}
