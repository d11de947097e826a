//! The simulation clock: scaled virtual time over a real-time source.
//!
//! A [`SimClock`] owns an anchor pair `(sim_anchor_ms, real_anchor_ms)`
//! and a signed scale factor. At any instant the simulated time is
//!
//! ```text
//! sim_anchor_ms + (now_real - real_anchor_ms) * scale
//! ```
//!
//! Every rate-affecting mutation (scale change, pause, resume) collapses
//! this formula into a fresh anchor before the rate changes, so simulated
//! time is continuous across the mutation; only its rate of change
//! afterward differs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::Receiver;
use orrery_events::{EventBus, Subscription};
use tracing::debug;

use crate::source::TimeSource;
use crate::timer::Timer;

/// Topic the clock broadcasts simulated time under.
pub const SYSTEM_TIME_TOPIC: &str = "system.time";

/// Real-time cadence of the simulated-time broadcast.
pub const BROADCAST_INTERVAL_MS: f64 = 1000.0;

/// State of the periodic time broadcast while it is enabled.
#[derive(Debug, Clone, Copy)]
struct Broadcast {
    next_due_real_ms: f64,
}

/// Virtual clock with a controllable rate, named timers, and an optional
/// periodic broadcast of the current simulated time.
///
/// Single execution context: every operation completes synchronously, and
/// the only recurring work, the broadcast, is cooperative, fired from
/// [`pump`](Self::pump) by the host loop rather than from a background
/// thread.
pub struct SimClock {
    source: Arc<dyn TimeSource>,
    sim_anchor_ms: f64,
    real_anchor_ms: f64,
    scale: f64,
    saved_scale: f64,
    paused: bool,
    timers: HashMap<String, Timer>,
    broadcast: Option<Broadcast>,
    bus: EventBus<f64>,
}

impl SimClock {
    /// Create a clock whose simulated time starts at the current wall
    /// time (milliseconds since the Unix epoch), running at scale 1.
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        let wall_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0);
        Self::with_start_time(source, wall_ms)
    }

    /// Create a clock whose simulated time starts at `start_sim_ms`,
    /// running at scale 1.
    pub fn with_start_time(source: Arc<dyn TimeSource>, start_sim_ms: f64) -> Self {
        let real_anchor_ms = source.now_ms();
        Self {
            source,
            sim_anchor_ms: start_sim_ms,
            real_anchor_ms,
            scale: 1.0,
            saved_scale: 1.0,
            paused: false,
            timers: HashMap::new(),
            broadcast: None,
            bus: EventBus::new(),
        }
    }

    /// Current simulated time in milliseconds. Pure read; never mutates.
    pub fn time(&self) -> f64 {
        self.sim_anchor_ms + (self.source.now_ms() - self.real_anchor_ms) * self.scale
    }

    /// Jump simulated time to `sim_ms` by resetting the anchor.
    ///
    /// Scale and pause state are untouched.
    pub fn set_time(&mut self, sim_ms: f64) {
        self.real_anchor_ms = self.source.now_ms();
        self.sim_anchor_ms = sim_ms;
    }

    /// The effective intended rate: the rate the clock runs at, or would
    /// resume at if currently paused.
    pub fn scale(&self) -> f64 {
        if self.paused { self.saved_scale } else { self.scale }
    }

    /// Change the rate at which simulated time advances.
    ///
    /// While paused, only the saved rate is updated: simulated time must
    /// not jump while frozen; the new rate takes effect on resume. While
    /// running, the anchor is collapsed to the current simulated time
    /// *before* the rate is assigned, so the already-elapsed interval
    /// keeps the rate it was integrated under.
    pub fn set_scale(&mut self, new_scale: f64) {
        if self.paused {
            self.saved_scale = new_scale;
            debug!(scale = new_scale, "scale deferred until resume");
            return;
        }
        self.set_time(self.time());
        self.scale = new_scale;
        debug!(scale = new_scale, "scale changed");
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume the clock. Both directions are idempotent.
    ///
    /// Pausing freezes [`time`](Self::time) by driving the internal rate
    /// to zero; resuming restores the saved rate with a fresh anchor, so
    /// no simulated time is lost or gained over the paused interval.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }
        if paused {
            self.saved_scale = self.scale;
            self.set_scale(0.0);
            self.paused = true;
            debug!(saved_scale = self.saved_scale, "clock paused");
        } else {
            self.paused = false;
            self.set_scale(self.saved_scale);
            debug!(scale = self.scale, "clock resumed");
        }
    }

    /// Create and register a timer named `name`, anchored at now.
    ///
    /// An existing timer of the same name is replaced.
    pub fn create_timer(&mut self, name: &str) -> &mut Timer {
        let now = self.source.now_ms();
        self.timers
            .entry(name.to_string())
            .insert_entry(Timer::new(name, now))
            .into_mut()
    }

    /// Return the timer named `name`, re-anchoring its sample point at
    /// now; the timer is created first if absent.
    pub fn start_timer(&mut self, name: &str) -> &mut Timer {
        let now = self.source.now_ms();
        self.timers
            .entry(name.to_string())
            .or_insert_with(|| Timer::new(name, now))
            .restart(now)
    }

    /// Elapsed simulated milliseconds since the named timer was last
    /// polled, or `None` if no such timer exists.
    pub fn delta(&mut self, name: &str) -> Option<f64> {
        let now = self.source.now_ms();
        let scale = self.scale;
        self.timers.get_mut(name).map(|t| t.sample(now, scale))
    }

    /// Enable or disable the periodic broadcast of simulated time on
    /// [`SYSTEM_TIME_TOPIC`]. Idempotent in both directions.
    ///
    /// Disabling deterministically prevents any further publish, even
    /// one already due at the moment of the call.
    pub fn set_broadcast(&mut self, enabled: bool) {
        match (enabled, self.broadcast.is_some()) {
            (true, false) => {
                self.broadcast = Some(Broadcast {
                    next_due_real_ms: self.source.now_ms() + BROADCAST_INTERVAL_MS,
                });
                debug!("time broadcast enabled");
            }
            (false, true) => {
                self.broadcast = None;
                debug!("time broadcast disabled");
            }
            _ => {}
        }
    }

    /// Whether the periodic broadcast is running.
    pub fn broadcast_enabled(&self) -> bool {
        self.broadcast.is_some()
    }

    /// Cooperative hook the host loop calls once per frame.
    ///
    /// Fires the time broadcast when its cadence has elapsed. At most one
    /// publish per call; the next one is due a full interval after this
    /// firing, so a stalled host catches up at one publish per frame
    /// rather than in a burst.
    pub fn pump(&mut self) {
        let now = self.source.now_ms();
        let due = matches!(self.broadcast, Some(b) if now >= b.next_due_real_ms);
        if due {
            let sim_ms = self.time();
            self.bus.publish(SYSTEM_TIME_TOPIC, sim_ms);
            if let Some(b) = &mut self.broadcast {
                b.next_due_real_ms = now + BROADCAST_INTERVAL_MS;
            }
        }
    }

    /// Subscribe to the simulated-time broadcast.
    pub fn subscribe_time(&mut self) -> (Subscription, Receiver<f64>) {
        self.bus.subscribe(SYSTEM_TIME_TOPIC)
    }

    /// Cancel a broadcast subscription.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.bus.unsubscribe(sub);
    }
}

impl std::fmt::Debug for SimClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimClock")
            .field("sim_anchor_ms", &self.sim_anchor_ms)
            .field("real_anchor_ms", &self.real_anchor_ms)
            .field("scale", &self.scale)
            .field("saved_scale", &self.saved_scale)
            .field("paused", &self.paused)
            .field("timers", &self.timers.len())
            .field("broadcast", &self.broadcast.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualSource;

    fn clock_at_zero() -> (Arc<ManualSource>, SimClock) {
        let source = ManualSource::new(0.0);
        let clock = SimClock::with_start_time(source.clone(), 0.0);
        (source, clock)
    }

    #[test]
    fn test_time_advances_at_unit_scale() {
        let (source, clock) = clock_at_zero();
        source.advance(500.0);
        assert!((clock.time() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_time_jumps_without_touching_scale() {
        let (source, mut clock) = clock_at_zero();
        clock.set_scale(3.0);
        clock.set_time(10_000.0);
        source.advance(100.0);
        assert!((clock.time() - 10_300.0).abs() < 1e-9);
        assert_eq!(clock.scale(), 3.0);
    }

    #[test]
    fn test_scale_zero_freezes_time_without_pausing() {
        let (source, mut clock) = clock_at_zero();
        source.advance(100.0);
        clock.set_scale(0.0);
        source.advance(1_000.0);
        assert!((clock.time() - 100.0).abs() < 1e-9);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_start_timer_creates_lazily() {
        let (source, mut clock) = clock_at_zero();
        assert_eq!(clock.delta("frame"), None);
        clock.start_timer("frame");
        source.advance(16.0);
        assert!((clock.delta("frame").unwrap() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_create_timer_overwrites_same_name() {
        let (source, mut clock) = clock_at_zero();
        clock.create_timer("frame");
        source.advance(100.0);
        clock.create_timer("frame");
        source.advance(10.0);
        assert!((clock.delta("frame").unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_timer_delta_uses_current_scale() {
        let (source, mut clock) = clock_at_zero();
        clock.set_scale(4.0);
        clock.start_timer("anim");
        source.advance(25.0);
        assert!((clock.delta("anim").unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_paused_timer_reports_zero_delta() {
        let (source, mut clock) = clock_at_zero();
        clock.start_timer("anim");
        clock.set_paused(true);
        source.advance(500.0);
        assert_eq!(clock.delta("anim"), Some(0.0));
    }

    #[test]
    fn test_broadcast_toggle_is_idempotent() {
        let (_source, mut clock) = clock_at_zero();
        clock.set_broadcast(true);
        clock.set_broadcast(true);
        assert!(clock.broadcast_enabled());
        clock.set_broadcast(false);
        clock.set_broadcast(false);
        assert!(!clock.broadcast_enabled());
    }

    #[test]
    fn test_pump_publishes_on_cadence() {
        let (source, mut clock) = clock_at_zero();
        let (_sub, rx) = clock.subscribe_time();
        clock.set_broadcast(true);

        source.advance(999.0);
        clock.pump();
        assert!(rx.try_recv().is_err(), "not yet due");

        source.advance(1.0);
        clock.pump();
        assert!((rx.try_recv().unwrap() - 1000.0).abs() < 1e-9);

        clock.pump();
        assert!(rx.try_recv().is_err(), "next publish a full interval away");
    }

    #[test]
    fn test_disable_cancels_due_publish() {
        let (source, mut clock) = clock_at_zero();
        let (_sub, rx) = clock.subscribe_time();
        clock.set_broadcast(true);

        // A publish is due, but the broadcast is disabled before pump runs.
        source.advance(5_000.0);
        clock.set_broadcast(false);
        clock.pump();
        assert!(rx.try_recv().is_err());
    }
}
