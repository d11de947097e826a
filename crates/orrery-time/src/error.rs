//! Time-model error types.

/// Errors produced by the time model.
///
/// The steady-state clock and timer APIs are infallible; the only
/// fallible surface is unit parsing and conversion.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    /// A unit name that is not one of the supported time units.
    #[error("unsupported time unit: {0:?}")]
    UnsupportedUnit(String),
}
