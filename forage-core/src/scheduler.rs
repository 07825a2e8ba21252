use std::time::{Duration, Instant};

/// Upper bound on how many missed periods a single poll reports.
const MAX_CATCH_UP: u32 = 5;

/// Fixed-interval trigger driven by an externally supplied clock.
///
/// The caller passes `now` on every poll, so the same ticker works against
/// `Instant::now()` or a virtual clock advanced in fixed steps.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn from_millis(interval_ms: u64, now: Instant) -> Self {
        Self::new(Duration::from_millis(interval_ms), now)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns how many periods have elapsed since the last poll.
    ///
    /// When the caller has fallen more than `MAX_CATCH_UP` periods behind, the
    /// backlog is dropped and the schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.interval;
            if fired == MAX_CATCH_UP {
                if now >= self.next_due {
                    self.next_due = now + self.interval;
                }
                break;
            }
        }
        fired
    }

    /// Time left until the next period elapses, zero if already due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
