//! Offline analysis of a coefficient set
//!
//! Pole locations and stability, complex frequency response, impulse response
//! and a measured steady-state gain. None of this runs in the streaming path;
//! it backs the `analyze_filter` tool and the tests.

use num_complex::Complex;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

use super::coefficients::Coefficients;
use super::filter::Filter;
use crate::constants::{MAX_ROOT_ITERATIONS, MIN_MAGNITUDE, MIN_RMS_THRESHOLD, ROOT_TOLERANCE};
use crate::error::{FilterError, Result};

/// One point of a sampled frequency response
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyPoint {
    pub frequency_hz: f64,
    pub magnitude: f64,
    pub magnitude_db: f64,
    /// Phase in radians, unwrapped across the sweep
    pub phase_radians: f64,
}

/// Pole locations of the feedback polynomial and the resulting verdict
#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub poles: Vec<Complex<f64>>,
    pub max_pole_magnitude: f64,
    pub stable: bool,
}

/// Evaluate `H(e^jw)` at a single frequency
pub fn response_at(coeffs: &Coefficients, freq_hz: f64, sample_rate: f64) -> Complex<f64> {
    let omega = TAU * freq_hz / sample_rate;
    let eval = |taps: &[f64]| -> Complex<f64> {
        taps.iter()
            .enumerate()
            .map(|(k, &c)| Complex::from_polar(c, -omega * k as f64))
            .sum()
    };
    eval(&coeffs.b) / eval(&coeffs.a)
}

/// Sample the frequency response at `points` frequencies from 0 Hz up to
/// (but excluding) Nyquist
pub fn frequency_response(
    coeffs: &Coefficients,
    sample_rate: f64,
    points: usize,
) -> Vec<FrequencyPoint> {
    let nyquist = sample_rate / 2.0;
    let responses: Vec<(f64, Complex<f64>)> = (0..points)
        .map(|k| {
            let freq = nyquist * k as f64 / points as f64;
            (freq, response_at(coeffs, freq, sample_rate))
        })
        .collect();

    let mut phases: Vec<f64> = responses.iter().map(|(_, h)| h.arg()).collect();
    unwrap_phase(&mut phases);

    responses
        .iter()
        .zip(phases)
        .map(|(&(frequency_hz, h), phase_radians)| {
            let magnitude = h.norm();
            FrequencyPoint {
                frequency_hz,
                magnitude,
                magnitude_db: 20.0 * (magnitude + MIN_MAGNITUDE).log10(),
                phase_radians,
            }
        })
        .collect()
}

/// Remove 2*pi discontinuities from a phase sequence in place
///
/// Consecutive samples differing by more than pi are shifted by the multiple
/// of 2*pi that brings the difference back into `[-pi, pi]`.
pub fn unwrap_phase(phases: &mut [f64]) {
    let Some(&first) = phases.first() else {
        return;
    };

    let mut prev = first;
    let mut offset = 0.0;
    for phase in phases.iter_mut().skip(1) {
        let raw = *phase;
        let delta = raw - prev;
        if delta.abs() > PI {
            offset -= TAU * (delta / TAU).round();
        }
        prev = raw;
        *phase = raw + offset;
    }
}

/// Roots of the feedback polynomial `a[0] z^N + a[1] z^(N-1) + ... + a[N]`
///
/// Uses Durand-Kerner iteration on the monic form.
///
/// # Errors
/// Returns `ZeroLeadingFeedback` if `a` is empty or `a[0] == 0`.
pub fn poles(coeffs: &Coefficients) -> Result<Vec<Complex<f64>>> {
    let a0 = match coeffs.a.first() {
        Some(&a0) if a0 != 0.0 => a0,
        _ => return Err(FilterError::ZeroLeadingFeedback),
    };
    let monic: Vec<f64> = coeffs.a.iter().map(|c| c / a0).collect();
    let degree = monic.len() - 1;
    if degree == 0 {
        return Ok(Vec::new());
    }

    let eval = |z: Complex<f64>| -> Complex<f64> {
        monic
            .iter()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * z + c)
    };

    // Standard non-symmetric seeds so conjugate pairs can separate
    let seed = Complex::new(0.4, 0.9);
    let mut roots: Vec<Complex<f64>> = (0..degree).map(|k| seed.powu(k as u32)).collect();

    for _ in 0..MAX_ROOT_ITERATIONS {
        let mut max_step = 0.0f64;
        for i in 0..degree {
            let zi = roots[i];
            let denom: Complex<f64> = roots
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &zj)| zi - zj)
                .product();
            let step = eval(zi) / denom;
            roots[i] = zi - step;
            max_step = max_step.max(step.norm());
        }
        if max_step < ROOT_TOLERANCE {
            break;
        }
    }

    Ok(roots)
}

/// Compute poles and decide stability
///
/// A causal filter is stable when every pole lies strictly inside the unit
/// circle.
pub fn stability(coeffs: &Coefficients) -> Result<StabilityReport> {
    let poles = poles(coeffs)?;
    let max_pole_magnitude = poles.iter().map(|p| p.norm()).fold(0.0, f64::max);
    let stable = max_pole_magnitude < 1.0;
    if !stable {
        log::warn!(
            "Filter is unstable: max pole magnitude {:.4}",
            max_pole_magnitude
        );
    }
    Ok(StabilityReport {
        poles,
        max_pole_magnitude,
        stable,
    })
}

/// Drive a filter with a unit impulse and collect `len` output samples
pub fn impulse_response<F: Filter>(filter: &mut F, len: usize) -> Vec<f32> {
    let mut buffer = vec![0.0f32; len];
    if let Some(first) = buffer.first_mut() {
        *first = 1.0;
    }
    filter.process_buffer(&mut buffer);
    buffer
}

/// Measure steady-state gain of a filter at a single frequency
///
/// Feeds `num_samples` of a unit sine through the filter and compares RMS
/// after discarding the first `settle` samples. Returns `None` when nothing
/// is left to measure or the input is silent.
pub fn measure_gain_db<F: Filter>(
    filter: &mut F,
    freq_hz: f32,
    sample_rate: f32,
    num_samples: usize,
    settle: usize,
) -> Option<f32> {
    if settle >= num_samples {
        return None;
    }

    let input: Vec<f32> = (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate).sin())
        .collect();
    let mut output = input.clone();
    filter.process_buffer(&mut output);

    let rms = |samples: &[f32]| -> f32 {
        (samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
    };
    let input_rms = rms(&input[settle..]);
    let output_rms = rms(&output[settle..]);

    if input_rms < MIN_RMS_THRESHOLD {
        return None;
    }
    Some(20.0 * (output_rms.max(MIN_RMS_THRESHOLD) / input_rms).log10())
}
