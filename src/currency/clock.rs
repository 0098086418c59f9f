//! Time source for staleness checks and refresh scheduling

use chrono::{DateTime, FixedOffset, Local};

pub trait Clock: Send + Sync {
    /// Current time in the offset calendar days are judged in
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
