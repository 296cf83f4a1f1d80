//! Cancellable delayed tasks.
//!
//! Preview rebuilds and persistence writes coalesce bursts of changes (a
//! streaming turn can touch the file set many times per second). Instead of
//! ad hoc timers, a [`Debouncer`] is an explicit deadline: scheduling again
//! cancels the prior deadline, and the owner polls it at its suspension
//! points. Single-threaded and deterministic under test.

use std::time::{Duration, Instant};

/// A schedule / reschedule-cancels-prior / fire-once deadline.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with a fixed delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Arm (or re-arm) the deadline at `now + delay`, cancelling any prior
    /// pending fire.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop any pending fire.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True while a fire is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed. Returns true at most once per
    /// `schedule`.
    pub fn fire_if_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume a pending deadline immediately, regardless of time left.
    /// Used on shutdown so the final state is never lost to coalescing.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut d = Debouncer::new(Duration::from_millis(0));
        assert!(!d.fire_if_due(), "nothing scheduled");

        d.schedule();
        assert!(d.fire_if_due());
        assert!(!d.fire_if_due(), "consumed");
    }

    #[test]
    fn test_reschedule_cancels_prior() {
        let mut d = Debouncer::new(Duration::from_secs(60));
        d.schedule();
        assert!(!d.fire_if_due(), "still far in the future");

        // Re-arming replaces the prior deadline instead of stacking.
        d.schedule();
        assert!(d.is_pending());
        assert!(d.flush());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut d = Debouncer::new(Duration::from_millis(0));
        d.schedule();
        d.cancel();
        assert!(!d.fire_if_due());
        assert!(!d.flush());
    }
}
