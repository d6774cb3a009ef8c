//! Trailing-edge debounce timer
//!
//! Each call to [`Debouncer::schedule`] cancels the pending deadline and sets
//! a new one `delay` in the future; [`Debouncer::fire_if_due`] reports the
//! deadline exactly once. Time is always passed in, so the timer has no clock
//! of its own.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet period from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the deadline, `None` when nothing is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// `true` once when the deadline has passed; the deadline is consumed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_nothing_pending_initially() {
        let mut debouncer = Debouncer::new(DELAY);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(Instant::now()));
        assert_eq!(debouncer.time_until_due(Instant::now()), None);
    }

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(299)));
        assert!(debouncer.fire_if_due(start + DELAY));
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_reschedule_cancels_previous_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(200));

        // The first deadline would have been due here
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(350)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.fire_if_due(start + DELAY));
    }

    #[test]
    fn test_time_until_due_saturates() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }
}
