//! Per-subsystem sampling points over the simulation clock.

/// A named sampling point reporting elapsed simulated milliseconds
/// between polls.
///
/// A timer holds no reference to its owning clock; the clock passes its
/// current effective scale and real-time reading into [`sample`](Self::sample)
/// explicitly. Timers are registered in, and owned by, a
/// [`SimClock`](crate::SimClock).
#[derive(Debug, Clone)]
pub struct Timer {
    name: String,
    last_sample_real_ms: f64,
}

impl Timer {
    /// Create a timer anchored at `now_real_ms`.
    pub fn new(name: impl Into<String>, now_real_ms: f64) -> Self {
        Self {
            name: name.into(),
            last_sample_real_ms: now_real_ms,
        }
    }

    /// The timer's name, unique within its owning clock.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-anchor the sample point at `now_real_ms` without reporting a
    /// delta. Call before a measurement series begins.
    pub fn restart(&mut self, now_real_ms: f64) -> &mut Self {
        self.last_sample_real_ms = now_real_ms;
        self
    }

    /// Elapsed simulated milliseconds since the previous sample, and
    /// move the sample point to `now_real_ms`.
    ///
    /// `scale` is applied uniformly to the whole elapsed real interval.
    /// This is exact as long as the owning clock's rate did not change
    /// between the two polls; when it did, the delta is slightly
    /// misattributed around the boundary instant (the new rate is applied
    /// to the full interval). Known limitation, kept deliberately:
    /// per-frame consumers accept the approximation, and callers needing
    /// authoritative simulated time read [`SimClock::time`](crate::SimClock::time)
    /// instead of accumulating timer deltas.
    pub fn sample(&mut self, now_real_ms: f64, scale: f64) -> f64 {
        let delta = scale * (now_real_ms - self.last_sample_real_ms);
        self.last_sample_real_ms = now_real_ms;
        delta
    }
}
