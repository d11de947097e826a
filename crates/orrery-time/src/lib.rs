//! Virtual time for an interactive orbital visualization.
//!
//! Decouples simulated time from wall-clock time behind a signed,
//! mutable scale factor: the simulation can run faster, slower, backward,
//! or be paused relative to real time, with exact restoration on resume.
//! A [`SimClock`] owns named [`Timer`]s that report elapsed simulated
//! milliseconds per poll (one per animation consumer), broadcasts its
//! current simulated time on a fixed cadence through an
//! [`orrery_events::EventBus`], and is driven cooperatively by the host
//! frame loop. No background threads, no locks.

mod clock;
mod error;
mod period;
mod source;
mod throttle;
mod timer;

pub use clock::{BROADCAST_INTERVAL_MS, SYSTEM_TIME_TOPIC, SimClock};
pub use error::TimeError;
pub use period::{ScalePreset, SimPeriod, TimeUnit, convert, convert_str};
pub use source::{ManualSource, MonotonicSource, TimeSource};
pub use throttle::Throttle;
pub use timer::Timer;
