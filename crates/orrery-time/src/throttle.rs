//! Trailing-edge rate limiter for high-frequency triggers.

/// Collapses a burst of trigger calls into a single deferred firing.
///
/// Explicit state object in place of a timeout closure: the host loop
/// calls [`trigger`](Self::trigger) whenever the underlying event occurs
/// (resize, rapid scale changes from a UI slider) and [`poll`](Self::poll)
/// once per frame; `poll` yields the queued arguments at most once per
/// burst, no sooner than `threshold_ms` after the burst's first call,
/// always with the latest arguments supplied. Earlier arguments in the
/// burst are dropped, never queued. There is no leading-edge firing.
#[derive(Debug)]
pub struct Throttle<T> {
    threshold_ms: f64,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    due_real_ms: f64,
    args: T,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given window in real milliseconds.
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            threshold_ms,
            pending: None,
        }
    }

    /// Record a trigger at real time `now_ms` carrying `args`.
    ///
    /// The first call of a burst schedules the firing `threshold_ms`
    /// later; calls landing while one is already scheduled replace the
    /// queued arguments without pushing the deadline out.
    pub fn trigger(&mut self, now_ms: f64, args: T) {
        match &mut self.pending {
            Some(pending) => pending.args = args,
            None => {
                self.pending = Some(Pending {
                    due_real_ms: now_ms + self.threshold_ms,
                    args,
                });
            }
        }
    }

    /// Yield the queued arguments if the deferred firing is due.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now_ms >= p.due_real_ms) {
            return self.pending.take().map(|p| p.args);
        }
        None
    }

    /// Drop any queued firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a firing is currently queued.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_collapses_to_last_arguments() {
        let mut throttle = Throttle::new(200.0);
        for i in 0..10 {
            throttle.trigger(i as f64 * 5.0, i);
        }
        // 10 calls within 50 ms; nothing may fire before 200 ms after the first.
        assert_eq!(throttle.poll(150.0), None);
        assert_eq!(throttle.poll(200.0), Some(9));
        assert_eq!(throttle.poll(400.0), None);
    }

    #[test]
    fn test_no_leading_edge() {
        let mut throttle = Throttle::new(100.0);
        throttle.trigger(0.0, "a");
        assert_eq!(throttle.poll(0.0), None);
        assert_eq!(throttle.poll(99.9), None);
        assert_eq!(throttle.poll(100.0), Some("a"));
    }

    #[test]
    fn test_separate_bursts_fire_separately() {
        let mut throttle = Throttle::new(100.0);
        throttle.trigger(0.0, 1);
        assert_eq!(throttle.poll(100.0), Some(1));
        throttle.trigger(500.0, 2);
        assert_eq!(throttle.poll(600.0), Some(2));
    }

    #[test]
    fn test_late_trigger_does_not_push_deadline() {
        let mut throttle = Throttle::new(200.0);
        throttle.trigger(0.0, 1);
        throttle.trigger(199.0, 2);
        assert_eq!(throttle.poll(200.0), Some(2));
    }

    #[test]
    fn test_cancel_drops_queued_firing() {
        let mut throttle = Throttle::new(100.0);
        throttle.trigger(0.0, 1);
        throttle.cancel();
        assert!(!throttle.is_pending());
        assert_eq!(throttle.poll(1_000.0), None);
    }
}
