//! Toy orbital propagation driven by simulated-time deltas.
//!
//! Stands in for the real scene update step: all it needs from the time
//! model is the simulated-millisecond delta for the current frame.

use std::f64::consts::TAU;

/// A body on a circular orbit, parameterized by its orbital period.
#[derive(Debug, Clone)]
pub struct OrbitalBody {
    angle_rad: f64,
    period_ms: f64,
}

impl OrbitalBody {
    /// Create a body at phase angle zero with the given orbital period
    /// in simulated milliseconds.
    pub fn new(period_ms: f64) -> Self {
        Self {
            angle_rad: 0.0,
            period_ms,
        }
    }

    /// Advance the orbit by `sim_delta_ms` simulated milliseconds.
    ///
    /// Negative deltas (time running backward) move the body the other
    /// way around the orbit.
    pub fn advance(&mut self, sim_delta_ms: f64) {
        let sweep = sim_delta_ms / self.period_ms * TAU;
        self.angle_rad = (self.angle_rad + sweep).rem_euclid(TAU);
    }

    /// Current phase angle in radians, always in `[0, TAU)`.
    pub fn angle_rad(&self) -> f64 {
        self.angle_rad
    }

    /// Current phase angle in degrees, always in `[0, 360)`.
    pub fn angle_deg(&self) -> f64 {
        self.angle_rad.to_degrees()
    }

    /// Position on a circle of `radius` around the origin.
    pub fn position(&self, radius: f64) -> (f64, f64) {
        (radius * self.angle_rad.cos(), radius * self.angle_rad.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_full_period_returns_to_start() {
        let mut body = OrbitalBody::new(1_000.0);
        body.advance(1_000.0);
        assert!(body.angle_rad().abs() < EPS);
    }

    #[test]
    fn test_quarter_period_is_quarter_turn() {
        let mut body = OrbitalBody::new(1_000.0);
        body.advance(250.0);
        assert!((body.angle_rad() - TAU / 4.0).abs() < EPS);
        let (x, y) = body.position(2.0);
        assert!(x.abs() < EPS);
        assert!((y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_negative_delta_wraps_backward() {
        let mut body = OrbitalBody::new(1_000.0);
        body.advance(-250.0);
        assert!((body.angle_rad() - 3.0 * TAU / 4.0).abs() < EPS);
        assert!((body.angle_deg() - 270.0).abs() < EPS);
    }

    #[test]
    fn test_zero_delta_holds_position() {
        let mut body = OrbitalBody::new(1_000.0);
        body.advance(100.0);
        let before = body.angle_rad();
        body.advance(0.0);
        assert_eq!(body.angle_rad(), before);
    }
}
