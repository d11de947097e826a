//! Real-time sources the clock anchors against.
//!
//! The simulation clock never reads wall time directly; it is handed a
//! [`TimeSource`] at construction. Production code uses
//! [`MonotonicSource`] (backed by [`Instant`]); tests use
//! [`ManualSource`], which only advances when told to, so no test ever
//! sleeps on real time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A supplier of "now" in milliseconds on some monotonic axis.
///
/// The zero point is arbitrary; only differences between readings are
/// meaningful. Readings must never decrease.
pub trait TimeSource: Send + Sync {
    /// Current real time in milliseconds since the source's origin.
    fn now_ms(&self) -> f64;
}

/// Monotonic wall-clock source. Zero is the instant of construction.
#[derive(Debug)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    /// Create a source whose zero point is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Deterministic source that advances only when instructed.
///
/// Stores the current reading as `f64` bits in an atomic so the handle
/// can be shared with a clock through `Arc<dyn TimeSource>` while the
/// test keeps its own `Arc<ManualSource>` to drive it. The time model
/// assumes a single execution context, so plain load/store ordering is
/// sufficient.
#[derive(Debug)]
pub struct ManualSource {
    now_bits: AtomicU64,
}

impl ManualSource {
    /// Create a source reading `start_ms`.
    pub fn new(start_ms: f64) -> Arc<Self> {
        Arc::new(Self {
            now_bits: AtomicU64::new(start_ms.to_bits()),
        })
    }

    /// Move the reading forward by `delta_ms`.
    pub fn advance(&self, delta_ms: f64) {
        let now = f64::from_bits(self.now_bits.load(Ordering::Acquire));
        self.set(now + delta_ms);
    }

    /// Set the reading to `now_ms` directly.
    pub fn set(&self, now_ms: f64) {
        self.now_bits.store(now_ms.to_bits(), Ordering::Release);
    }
}

impl TimeSource for ManualSource {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_source_starts_at_seed() {
        let source = ManualSource::new(250.0);
        assert_eq!(source.now_ms(), 250.0);
    }

    #[test]
    fn test_manual_source_advances() {
        let source = ManualSource::new(0.0);
        source.advance(100.0);
        source.advance(50.5);
        assert!((source.now_ms() - 150.5).abs() < 1e-9);
    }

    #[test]
    fn test_manual_source_set_overrides() {
        let source = ManualSource::new(10.0);
        source.set(3.0);
        assert_eq!(source.now_ms(), 3.0);
    }

    #[test]
    fn test_monotonic_source_never_decreases() {
        let source = MonotonicSource::new();
        let a = source.now_ms();
        let b = source.now_ms();
        assert!(b >= a);
    }
}
