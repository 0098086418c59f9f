//! Persisted exchange-rate record

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// The single cached rate and when it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateRecord {
    pub rate: f64,

    /// Stored as an ISO-8601 string
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<FixedOffset>,
}

impl ExchangeRateRecord {
    pub fn new(rate: f64, last_updated: DateTime<FixedOffset>) -> Self {
        Self { rate, last_updated }
    }

    /// Parse a stored value; malformed or unusable records yield `None`
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str::<ExchangeRateRecord>(raw) {
            Ok(record) if record.rate.is_finite() && record.rate > 0.0 => Some(record),
            Ok(record) => {
                log::warn!("Ignoring stored exchange rate with invalid rate {}", record.rate);
                None
            }
            Err(e) => {
                log::warn!("Failed to parse stored currency data: {}", e);
                None
            }
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Calendar day of the update, seen from `now`'s offset
    pub fn day_in(&self, now: &DateTime<FixedOffset>) -> NaiveDate {
        self.last_updated.with_timezone(now.offset()).date_naive()
    }

    /// Whether the record was written on the same calendar day as `now`
    pub fn is_fresh(&self, now: &DateTime<FixedOffset>) -> bool {
        self.day_in(now) == now.date_naive()
    }
}
