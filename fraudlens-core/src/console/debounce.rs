//! Trailing-edge coalescing for search keystrokes.

use std::time::{Duration, Instant};

/// Holds at most one pending value and releases it once input settles.
///
/// Every [`push`](Self::push) replaces the pending value and restarts the
/// quiet period. [`poll`](Self::poll) hands out the value once the quiet
/// period has elapsed. Time is passed in so callers (and tests) own the clock.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value.
    ///
    /// With a zero delay nothing is held back and the value is returned
    /// immediately.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        if self.delay.is_zero() {
            self.pending = None;
            return Some(value);
        }
        self.pending = Some((value, now + self.delay));
        None
    }

    /// Release the pending value if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if settled {
            self.flush()
        } else {
            None
        }
    }

    /// Release the pending value regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_settled_value_is_released() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(250));

        assert_eq!(debouncer.push("a", start), None);
        assert_eq!(debouncer.push("ab", start + Duration::from_millis(100)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), Some("ab"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_zero_delay_passes_through() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert_eq!(debouncer.push(1, Instant::now()), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_secs(10));
        debouncer.push("query", now);
        assert_eq!(debouncer.flush(), Some("query"));
        assert_eq!(debouncer.flush(), None);
    }
}
