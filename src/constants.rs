//! Numeric constants for filter validation and analysis
//!
//! These constants define tolerances and floors used when checking
//! coefficients and evaluating frequency responses.

/// Allowed deviation of `A[0]` from 1.0 before coefficients are rejected as
/// un-normalized.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Floor added to magnitudes before taking the logarithm, so a response zero
/// maps to a finite (very negative) dB value.
pub const MIN_MAGNITUDE: f64 = 1e-12;

/// Convergence threshold for the polynomial root finder.
pub const ROOT_TOLERANCE: f64 = 1e-12;

/// Iteration cap for the polynomial root finder.
pub const MAX_ROOT_ITERATIONS: usize = 500;

/// Minimum RMS below which a gain measurement is considered silent.
pub const MIN_RMS_THRESHOLD: f32 = 1e-9;
