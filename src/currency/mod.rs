//! GBP to USD rate cache with daily refresh and persisted fallback

mod cache;
mod clock;
mod config;
mod display;
mod fetch;
mod record;
mod scheduler;
mod store;

pub use cache::{CacheState, RateCache, RateSnapshot, RateSource};
pub use clock::{Clock, SystemClock};
pub use config::{CurrencyConfig, DEFAULT_RATE_ENDPOINT, DEFAULT_STORAGE_KEY, FALLBACK_RATE};
pub use display::{CurrencyDisplay, DisplayLines, format_amount, format_gbp, format_usd, MASKED};
pub use fetch::{HttpRateFetcher, RateFetcher};
pub use record::ExchangeRateRecord;
pub use scheduler::{
    next_refresh_delay, ManualScheduler, RefreshFuture, RefreshJob, ScheduleHandle, Scheduler,
    TokioScheduler, DAILY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
