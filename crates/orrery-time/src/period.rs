//! Time units, rate presets, and structured simulated-time periods.
//!
//! Simulated durations cross the API as plain milliseconds; this module
//! provides the structured form a UI readout wants (days / hours /
//! minutes / seconds / millis) and the unit-conversion table behind the
//! viewer's rate presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimeError;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// The time units the conversion table understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Length of one of this unit in milliseconds.
    pub fn in_millis(self) -> f64 {
        match self {
            TimeUnit::Days => MILLIS_PER_DAY as f64,
            TimeUnit::Hours => MILLIS_PER_HOUR as f64,
            TimeUnit::Minutes => MILLIS_PER_MINUTE as f64,
            TimeUnit::Seconds => MILLIS_PER_SECOND as f64,
            TimeUnit::Milliseconds => 1.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Ok(TimeUnit::Days),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hours),
            "m" | "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            other => Err(TimeError::UnsupportedUnit(other.to_string())),
        }
    }
}

/// Convert `value` expressed in `from` into `to`.
pub fn convert(value: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    value * from.in_millis() / to.in_millis()
}

/// Convert between units named by string, e.g. `("hours", "seconds")`.
///
/// Fails with [`TimeError::UnsupportedUnit`] for an unrecognized name;
/// the failure is fatal to this call only, never to the clock.
pub fn convert_str(value: f64, from: &str, to: &str) -> Result<f64, TimeError> {
    Ok(convert(value, from.parse()?, to.parse()?))
}

/// Named clock-rate presets the viewer exposes.
///
/// Each preset is the scale factor that makes one simulated span of the
/// named unit elapse per real second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalePreset {
    /// Simulated time tracks real time.
    RealTime,
    /// One simulated minute per real second.
    MinutePerSecond,
    /// One simulated hour per real second.
    HourPerSecond,
    /// One simulated day per real second.
    DayPerSecond,
    /// Real time, backward.
    Reverse,
}

impl ScalePreset {
    /// The scale factor this preset stands for.
    pub fn factor(self) -> f64 {
        match self {
            ScalePreset::RealTime => 1.0,
            ScalePreset::MinutePerSecond => convert(1.0, TimeUnit::Minutes, TimeUnit::Seconds),
            ScalePreset::HourPerSecond => convert(1.0, TimeUnit::Hours, TimeUnit::Seconds),
            ScalePreset::DayPerSecond => convert(1.0, TimeUnit::Days, TimeUnit::Seconds),
            ScalePreset::Reverse => -1.0,
        }
    }
}

/// A simulated duration decomposed into calendar-free components.
///
/// Components carry a consistent sign: a negative duration (time run
/// backward) has every non-zero component negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimPeriod {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub millis: i64,
}

impl SimPeriod {
    /// Total length in milliseconds.
    pub fn to_millis(&self) -> f64 {
        (self.days * MILLIS_PER_DAY
            + self.hours * MILLIS_PER_HOUR
            + self.minutes * MILLIS_PER_MINUTE
            + self.seconds * MILLIS_PER_SECOND
            + self.millis) as f64
    }

    /// Decompose `ms` (rounded to the nearest millisecond) into period
    /// components. Inverse of [`to_millis`](Self::to_millis) for any
    /// normalized period.
    pub fn from_millis(ms: f64) -> Self {
        let total = ms.round() as i64;
        Self {
            days: total / MILLIS_PER_DAY,
            hours: total % MILLIS_PER_DAY / MILLIS_PER_HOUR,
            minutes: total % MILLIS_PER_HOUR / MILLIS_PER_MINUTE,
            seconds: total % MILLIS_PER_MINUTE / MILLIS_PER_SECOND,
            millis: total % MILLIS_PER_SECOND,
        }
    }

    /// Canonical form: every component within its natural range, all
    /// carrying the sign of the total.
    pub fn normalized(self) -> Self {
        Self::from_millis(self.to_millis())
    }
}

impl fmt::Display for SimPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.to_millis();
        let p = Self::from_millis(total.abs());
        if total < 0.0 {
            write!(f, "-")?;
        }
        if p.days != 0 {
            write!(f, "{}d ", p.days)?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            p.hours, p.minutes, p.seconds, p.millis
        )
    }
}
