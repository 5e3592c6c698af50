//! Summary statistics over a sampled signal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    /// Root mean square.
    pub rms: f64,
    /// `max(|min|, |max|)`
    pub peak: f64,
    pub min: f64,
    pub max: f64,
}

/// Statistics over the finite samples only. All zeros if none are finite.
pub fn calculate_signal_stats(signal: &[f64]) -> SignalStats {
    let valid: Vec<f64> = signal.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.is_empty() {
        return SignalStats::default();
    }

    let count = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / count;
    let rms = (valid.iter().map(|x| x * x).sum::<f64>() / count).sqrt();
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SignalStats {
        mean,
        rms,
        peak: min.abs().max(max.abs()),
        min,
        max,
    }
}
