//! Debounce timer
//!
//! One-shot deadline armed by the first event of a window. Later events
//! inside the window do not push it back.

use std::time::{Duration, Instant};

/// One-shot coalescing deadline
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Start the window at `now`, unless one is already running
    pub fn arm(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Whether the window has elapsed at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Fire if due: disarms and returns true
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_sets_deadline() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(Duration::from_millis(100));
        assert!(timer.arm(start));
        assert!(!timer.arm(start + Duration::from_millis(50)));
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_fire_disarms() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(Duration::from_millis(100));
        timer.arm(start);
        assert!(!timer.fire(start + Duration::from_millis(99)));
        assert!(timer.fire(start + Duration::from_millis(100)));
        assert!(!timer.is_armed());
        assert!(!timer.fire(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(Duration::ZERO);
        timer.arm(start);
        timer.cancel();
        assert!(!timer.is_due(start));
        assert!(timer.arm(start));
        assert!(timer.is_due(start));
    }
}
