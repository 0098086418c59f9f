//! Currency rate cache
//!
//! Holds one GBP to USD rate for the whole process. A refresh reads the
//! persisted record first and only goes to the network when that record is
//! missing or from an earlier calendar day. Failures degrade to the stale
//! record, then to the configured fallback constant; a refresh always ends
//! in `Ready`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use tokio::sync::Mutex;

use super::clock::Clock;
use super::config::CurrencyConfig;
use super::fetch::RateFetcher;
use super::record::ExchangeRateRecord;
use super::scheduler::{next_refresh_delay, RefreshFuture, RefreshJob, ScheduleHandle, Scheduler};
use super::store::KeyValueStore;

/// Where the current rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateSource {
    /// Fetched from the network during this refresh
    Live,
    /// Read from the persisted record
    Cached,
    /// Hardcoded constant
    Fallback,
}

/// A usable rate and how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub rate: f64,
    pub source: RateSource,

    /// Set when the rate is a stale record or the fallback constant
    pub degraded: bool,

    /// When the rate was fetched; `None` for the fallback constant
    pub last_updated: Option<DateTime<FixedOffset>>,

    /// Calendar day the refresh that produced this snapshot ran
    pub loaded_on: NaiveDate,
}

impl RateSnapshot {
    fn live(rate: f64, now: DateTime<FixedOffset>) -> Self {
        Self {
            rate,
            source: RateSource::Live,
            degraded: false,
            last_updated: Some(now),
            loaded_on: now.date_naive(),
        }
    }

    fn cached(record: &ExchangeRateRecord, now: &DateTime<FixedOffset>, degraded: bool) -> Self {
        Self {
            rate: record.rate,
            source: RateSource::Cached,
            degraded,
            last_updated: Some(record.last_updated),
            loaded_on: now.date_naive(),
        }
    }

    fn fallback(rate: f64, now: &DateTime<FixedOffset>) -> Self {
        Self {
            rate,
            source: RateSource::Fallback,
            degraded: true,
            last_updated: None,
            loaded_on: now.date_naive(),
        }
    }
}

/// Lifecycle of the cache
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Uninitialized,
    /// Refresh in flight; `previous` keeps serving conversions meanwhile
    Loading {
        previous: Option<RateSnapshot>,
    },
    Ready(RateSnapshot),
}

impl CacheState {
    fn snapshot(&self) -> Option<&RateSnapshot> {
        match self {
            CacheState::Uninitialized => None,
            CacheState::Loading { previous } => previous.as_ref(),
            CacheState::Ready(snapshot) => Some(snapshot),
        }
    }
}

/// Process-wide GBP to USD rate, shared by reference with every consumer
pub struct RateCache {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn RateFetcher>,
    clock: Arc<dyn Clock>,
    config: CurrencyConfig,
    state: RwLock<CacheState>,
    // Serialises refreshes so concurrent callers share one fetch
    refresh_lock: Mutex<()>,
    // Completed refreshes, so a waiter can tell it was served by another caller
    generation: AtomicU64,
}

impl RateCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn RateFetcher>,
        clock: Arc<dyn Clock>,
        config: CurrencyConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            clock,
            config,
            state: RwLock::new(CacheState::Uninitialized),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CurrencyConfig {
        &self.config
    }

    pub fn state(&self) -> CacheState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Latest usable rate, including the previous one while a refresh runs
    pub fn snapshot(&self) -> Option<RateSnapshot> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
            .cloned()
    }

    pub fn rate(&self) -> Option<f64> {
        self.snapshot().map(|s| s.rate)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), CacheState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        !self.is_ready()
    }

    /// Convert a GBP amount; 0 until a rate has been established
    pub fn convert_to_usd(&self, gbp_amount: f64) -> f64 {
        match self.rate() {
            Some(rate) => gbp_amount * rate,
            None => 0.0,
        }
    }

    /// Establish a rate if none exists yet
    pub async fn init(self: &Arc<Self>) -> RateSnapshot {
        if let CacheState::Ready(snapshot) = self.state() {
            return snapshot;
        }
        self.refresh().await
    }

    /// Bring the rate up to date for today. Never fails.
    ///
    /// The work runs on its own task, so a caller that stops waiting does not
    /// leave the cache stuck in `Loading`; the refresh still lands.
    pub async fn refresh(self: &Arc<Self>) -> RateSnapshot {
        let seen = self.generation.load(Ordering::Acquire);
        let cache = Arc::clone(self);
        let task = tokio::spawn(async move { cache.run_refresh(seen).await });

        match task.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Exchange rate refresh task failed: {}", e);
                self.snapshot()
                    .unwrap_or_else(|| RateSnapshot::fallback(self.config.fallback_rate, &self.clock.now()))
            }
        }
    }

    async fn run_refresh(&self, seen: u64) -> RateSnapshot {
        let _guard = self.refresh_lock.lock().await;
        let now = self.clock.now();

        if let CacheState::Ready(snapshot) = self.state() {
            // Someone else finished a refresh while we waited for the lock
            let joined = self.generation.load(Ordering::Acquire) != seen;
            let current = !snapshot.degraded && snapshot.loaded_on == now.date_naive();
            if joined || current {
                return snapshot;
            }
        }

        let previous = self.begin_loading();
        let stored = self.read_record().await;

        let snapshot = match stored {
            Some(record) if record.is_fresh(&now) => {
                log::debug!("Using exchange rate {} stored today", record.rate);
                RateSnapshot::cached(&record, &now, false)
            }
            stored => match self.fetcher.fetch_live_rate().await {
                Ok(rate) => {
                    log::info!("Fetched live exchange rate {}", rate);
                    self.persist(ExchangeRateRecord::new(rate, now)).await;
                    RateSnapshot::live(rate, now)
                }
                Err(e) => {
                    log::warn!("Failed to fetch exchange rate: {}", e);
                    self.degraded_snapshot(stored, previous, &now)
                }
            },
        };

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = CacheState::Ready(snapshot.clone());
        self.generation.fetch_add(1, Ordering::AcqRel);
        snapshot
    }

    /// Refresh at the configured time of day, every day, until the handle is dropped
    pub fn start_daily_refresh(self: &Arc<Self>, scheduler: &dyn Scheduler) -> ScheduleHandle {
        let delay = next_refresh_delay(&self.clock.now(), self.config.refresh_at);
        let cache = Arc::clone(self);
        let job: RefreshJob = Arc::new(move || -> RefreshFuture {
            let cache = Arc::clone(&cache);
            Box::pin(async move {
                cache.refresh().await;
            })
        });
        scheduler.schedule_daily(delay, job)
    }

    fn begin_loading(&self) -> Option<RateSnapshot> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let previous = state.snapshot().cloned();
        *state = CacheState::Loading { previous: previous.clone() };
        previous
    }

    /// Next-best rate after a failed fetch: stale record, then the rate already
    /// held in memory, then the fallback constant
    fn degraded_snapshot(
        &self,
        stored: Option<ExchangeRateRecord>,
        previous: Option<RateSnapshot>,
        now: &DateTime<FixedOffset>,
    ) -> RateSnapshot {
        if let Some(record) = stored {
            log::warn!("Using cached exchange rate {} (API unavailable)", record.rate);
            return RateSnapshot::cached(&record, now, true);
        }

        match previous {
            Some(previous) if previous.source != RateSource::Fallback => {
                log::warn!("Keeping in-memory exchange rate {} (API unavailable)", previous.rate);
                RateSnapshot {
                    degraded: true,
                    loaded_on: now.date_naive(),
                    source: RateSource::Cached,
                    ..previous
                }
            }
            _ => {
                log::warn!(
                    "Using fallback exchange rate {} (API unavailable)",
                    self.config.fallback_rate
                );
                RateSnapshot::fallback(self.config.fallback_rate, now)
            }
        }
    }

    async fn read_record(&self) -> Option<ExchangeRateRecord> {
        match self.store.get(&self.config.storage_key).await {
            Ok(Some(raw)) => ExchangeRateRecord::decode(&raw),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read stored currency data: {}", e);
                None
            }
        }
    }

    async fn persist(&self, record: ExchangeRateRecord) {
        let encoded = match record.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Failed to encode currency data: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.config.storage_key, &encoded).await {
            log::warn!("Failed to store currency data: {}", e);
        }
    }
}
