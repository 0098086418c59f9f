//! Daily refresh scheduling
//!
//! The cache never touches timers directly; it hands a job to a
//! [`Scheduler`]. [`TokioScheduler`] drives real timers, [`ManualScheduler`]
//! lets tests fire the job on demand.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Days, FixedOffset, NaiveTime};
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

/// One day between recurring refreshes
pub const DAILY: Duration = Duration::from_secs(24 * 60 * 60);

pub type RefreshFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Work run on every scheduled tick
pub type RefreshJob = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

pub trait Scheduler: Send + Sync {
    /// Run `job` after `first_run_in`, then once a day
    fn schedule_daily(&self, first_run_in: Duration, job: RefreshJob) -> ScheduleHandle;
}

/// Keeps a schedule alive; dropping it cancels the timer
#[derive(Debug)]
pub struct ScheduleHandle {
    task: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    /// Handle with no timer behind it
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Time from `now` until the next `at` strictly after it, in `now`'s offset
pub fn next_refresh_delay(now: &DateTime<FixedOffset>, at: NaiveTime) -> Duration {
    let today = now.date_naive().and_time(at);
    let next = if today > now.naive_local() {
        today
    } else {
        now.date_naive()
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(at))
            .unwrap_or(today)
    };
    (next - now.naive_local()).to_std().unwrap_or(Duration::ZERO)
}

/// Timer-driven scheduler on a Tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    period: Duration,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle, period: DAILY }
    }

    /// Scheduler on the runtime the caller is running in
    pub fn current() -> Result<Self, TryCurrentError> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// Override the recurrence period
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_daily(&self, first_run_in: Duration, job: RefreshJob) -> ScheduleHandle {
        let period = self.period;
        log::debug!("Scheduling rate refresh in {:?}, then every {:?}", first_run_in, period);

        let task = self.handle.spawn(async move {
            tokio::time::sleep(first_run_in).await;
            loop {
                job().await;
                tokio::time::sleep(period).await;
            }
        });
        ScheduleHandle { task: Some(task) }
    }
}

/// Deterministic scheduler that only runs jobs when told to
#[derive(Default)]
pub struct ManualScheduler {
    scheduled: Mutex<Vec<(Duration, RefreshJob)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial delays requested so far, in scheduling order
    pub fn delays(&self) -> Vec<Duration> {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(delay, _)| *delay)
            .collect()
    }

    /// Run every scheduled job once, as if its timer had elapsed
    pub async fn fire(&self) {
        let jobs: Vec<RefreshJob> = self
            .scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, job)| Arc::clone(job))
            .collect();

        for job in jobs {
            job().await;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_daily(&self, first_run_in: Duration, job: RefreshJob) -> ScheduleHandle {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((first_run_in, job));
        ScheduleHandle::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn one_past_midnight() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 1, 0).unwrap()
    }

    #[test]
    fn test_delay_to_next_day() {
        let delay = next_refresh_delay(&at("2025-03-14T15:00:00+00:00"), one_past_midnight());
        assert_eq!(delay, Duration::from_secs(9 * 3600 + 60));
    }

    #[test]
    fn test_delay_same_day_before_refresh_time() {
        let delay = next_refresh_delay(&at("2025-03-14T00:00:30+01:00"), one_past_midnight());
        assert_eq!(delay, Duration::from_secs(30));
    }

    #[test]
    fn test_delay_exactly_at_refresh_time_waits_a_day() {
        let delay = next_refresh_delay(&at("2025-03-14T00:01:00+00:00"), one_past_midnight());
        assert_eq!(delay, DAILY);
    }

    fn counting_job(counter: &Arc<AtomicUsize>) -> RefreshJob {
        let counter = Arc::clone(counter);
        Arc::new(move || -> RefreshFuture {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test]
    async fn test_manual_scheduler_fires_on_demand() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule_daily(Duration::from_secs(60), counting_job(&counter));
        assert!(!handle.is_active());
        assert_eq!(scheduler.delays(), vec![Duration::from_secs(60)]);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        scheduler.fire().await;
        scheduler.fire().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_recurs_until_cancelled() {
        let scheduler = TokioScheduler::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule_daily(Duration::from_secs(60), counting_job(&counter));
        assert!(handle.is_active());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(DAILY).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        handle.cancel();
        tokio::time::sleep(DAILY * 2).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_custom_period() {
        let scheduler = TokioScheduler::current().unwrap().with_period(Duration::from_secs(3600));
        let counter = Arc::new(AtomicUsize::new(0));

        let _handle = scheduler.schedule_daily(Duration::ZERO, counting_job(&counter));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
