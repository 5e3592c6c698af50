//! Chart projections: flattens signals and spectra into plot-ready points.
//!
//! Values are rounded for display and anything non-finite is plotted as 0.

use serde::{Deserialize, Serialize};

use super::dft::SpectralBin;
use super::signal::sample_times;
use super::significance::bin_frequency;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPoint {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
    pub real: f64,
    pub imaginary: f64,
}

/// Visible frequency axis bounds in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min: f64,
    pub max: f64,
}

/// Axis upper bound used when nothing in the spectrum stands out.
const FALLBACK_RANGE_MAX: f64 = 20.0;
/// Relative level a point must exceed to widen the display range.
const RANGE_SIGNIFICANCE: f64 = 0.01;
/// Headroom above the highest significant frequency.
const RANGE_HEADROOM: f64 = 1.2;

/// Round to `places` decimals; non-finite values become 0.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        // `+ 0.0` turns -0.0 into 0.0
        rounded + 0.0
    } else {
        value
    }
}

/// Pair each sample with its time on the `[x_start, x_end]` grid.
pub fn generate_time_data(signal: &[f64], x_start: f64, x_end: f64) -> Vec<TimePoint> {
    sample_times(signal.len(), x_start, x_end)
        .zip(signal)
        .map(|(time, &value)| TimePoint {
            time: round_to(time, 6),
            value: round_to(value, 6),
        })
        .collect()
}

/// Single-sided (`0..=N/2`) frequency/amplitude pairs.
pub fn generate_frequency_data(spectrum: &[SpectralBin], sample_rate: f64) -> Vec<FrequencyPoint> {
    let n = spectrum.len();
    spectrum
        .iter()
        .take(n / 2 + 1)
        .enumerate()
        .map(|(k, bin)| FrequencyPoint {
            frequency: round_to(bin_frequency(k, sample_rate, n), 3),
            amplitude: round_to(bin.amplitude, 6),
            phase: round_to(bin.phase, 6),
            real: round_to(bin.real, 6),
            imaginary: round_to(bin.imaginary, 6),
        })
        .collect()
}

/// Frequency axis that fits the visible content: 20% above the highest
/// point exceeding 1% of `max(peak, 1)`, capped at `max_frequency`.
pub fn calculate_optimal_frequency_range(
    points: &[FrequencyPoint],
    max_frequency: f64,
) -> FrequencyRange {
    let peak = points.iter().map(|p| p.amplitude).fold(1.0_f64, f64::max);
    let cutoff = RANGE_SIGNIFICANCE * peak;

    let highest = points
        .iter()
        .filter(|p| p.amplitude > cutoff)
        .map(|p| p.frequency)
        .fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |m| m.max(f))));

    match highest {
        Some(freq) => FrequencyRange {
            min: 0.0,
            max: (freq * RANGE_HEADROOM).min(max_frequency),
        },
        None => FrequencyRange {
            min: 0.0,
            max: FALLBACK_RANGE_MAX.min(max_frequency),
        },
    }
}
