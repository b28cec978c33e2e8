//! Progress notification throttling.

use std::time::Duration;

use tokio::time::Instant;

/// Rate limiter for progress notifications.
///
/// The first notification is allowed one interval after construction; each
/// allowed notification pushes the next threshold one interval past the
/// moment it was allowed. Calls before the threshold are refused and
/// nothing is queued.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    next_notify: Instant,
}

impl ProgressThrottle {
    /// Create a throttle whose first window ends `interval` from now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_notify: Instant::now() + interval,
        }
    }

    /// Returns `true` if a notification may be sent now, and if so starts
    /// the next window.
    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_notify {
            return false;
        }
        self.next_notify = now + self.interval;
        true
    }

    /// Earliest instant at which the next notification is allowed.
    pub fn next_notify(&self) -> Instant {
        self.next_notify
    }
}
