//! Significance filter: picks the bins that stand out from the spectrum.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::dft::SpectralBin;

/// A spectral bin with its index converted to Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificantComponent {
    /// Frequency in Hz: `bin · sample_rate / N`.
    pub frequency: f64,
    pub bin: usize,
    pub real: f64,
    pub imaginary: f64,
    pub amplitude: f64,
    pub phase: f64,
}

/// Convert bin index `k` of an `n`-point spectrum to Hz.
pub fn bin_frequency(k: usize, sample_rate: f64, n: usize) -> f64 {
    (k as f64 * sample_rate) / n as f64
}

/// Absolute amplitude cutoff: `threshold · max(peak, 1)`, where the peak is
/// taken over the whole spectrum.
pub fn amplitude_cutoff(spectrum: &[SpectralBin], threshold: f64) -> f64 {
    let max_amplitude = spectrum
        .iter()
        .map(|b| b.amplitude)
        .fold(1.0_f64, f64::max);
    threshold * max_amplitude
}

/// Single-sided bins (`0..=N/2`) whose amplitude is strictly above the
/// cutoff, strongest first. Equal amplitudes keep bin order.
pub fn extract_significant_frequencies(
    spectrum: &[SpectralBin],
    sample_rate: f64,
    threshold: f64,
) -> Vec<SignificantComponent> {
    let n = spectrum.len();
    let cutoff = amplitude_cutoff(spectrum, threshold);

    let mut significant: Vec<SignificantComponent> = spectrum
        .iter()
        .take(n / 2 + 1)
        .enumerate()
        .filter(|(_, bin)| bin.amplitude > cutoff)
        .map(|(k, bin)| SignificantComponent {
            frequency: bin_frequency(k, sample_rate, n),
            bin: k,
            real: bin.real,
            imaginary: bin.imaginary,
            amplitude: bin.amplitude,
            phase: bin.phase,
        })
        .collect();

    // `sort_by` is stable, so ties stay in bin order.
    significant.sort_by(|a, b| {
        b.amplitude
            .partial_cmp(&a.amplitude)
            .unwrap_or(Ordering::Equal)
    });

    log::debug!(
        "{} of {} bins above cutoff {cutoff:.6}",
        significant.len(),
        n
    );
    significant
}
