//! Single-shot, cancelable deadlines.
//!
//! Components never spawn their own timers. Each one keeps a [`Debounce`] per
//! timer purpose, reports its earliest deadline, and is polled by the runtime
//! loop once that deadline passes. Re-arming replaces the previous deadline, so
//! a stale timer can never fire after its purpose was re-scheduled.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default, Clone)]
pub struct Debounce {
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, discarding any earlier deadline
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the armed deadline has been reached
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of several optional deadlines
pub fn earliest<I>(deadlines: I) -> Option<Instant>
where
    I: IntoIterator<Item = Option<Instant>>,
{
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = Debounce::new();
        timer.arm(start, Duration::from_millis(300));

        assert!(!timer.fire(start + Duration::from_millis(299)));
        assert!(timer.fire(start + Duration::from_millis(300)));
        assert!(!timer.fire(start + Duration::from_millis(400)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_rearm_replaces_previous_deadline() {
        let start = Instant::now();
        let mut timer = Debounce::new();
        timer.arm(start, Duration::from_millis(300));
        timer.arm(start + Duration::from_millis(200), Duration::from_millis(300));

        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(500)));
        assert!(!timer.fire(start + Duration::from_millis(300)));
        assert!(timer.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let start = Instant::now();
        let mut timer = Debounce::new();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();

        assert!(timer.deadline().is_none());
        assert!(!timer.fire(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_earliest_skips_unarmed() {
        let start = Instant::now();
        let later = start + Duration::from_millis(50);
        assert_eq!(earliest([None, Some(later), Some(start)]), Some(start));
        assert_eq!(earliest([None, None]), None);
    }
}
