use std::time::{Duration, Instant};

/// Fixed-interval timer driven by the host's clock.
///
/// The first [`IntervalTimer::advance`] fires immediately; later ones fire once at least one
/// interval has elapsed since the last firing. Missed intervals do not accumulate.
#[derive(Clone, Debug)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Option<Instant>,
    stopped: bool,
}

impl IntervalTimer {
    /// Timer firing every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            stopped: false,
        }
    }

    /// Configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Report whether the timer fires at `now`.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Stop for good. Idempotent.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.next_due = None;
    }

    /// Whether [`IntervalTimer::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
