//! Spectral analyzer: naive O(N²) discrete Fourier transform with
//! single-sided amplitude normalization.
//!
//! Bin `k` accumulates `x[n]·cos(-2πkn/N)` and `x[n]·sin(-2πkn/N)`, then is
//! scaled by `1/N` for DC and Nyquist and `2/N` for every other bin, so a
//! sinusoid of amplitude `A` that lands on a bin reads back as `A`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Amplitudes at or below this are treated as zero when computing phase.
pub const PHASE_EPSILON: f64 = 1e-10;

/// One DFT output bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralBin {
    pub frequency_index: usize,
    pub real: f64,
    pub imaginary: f64,
    /// `sqrt(real² + imaginary²)`
    pub amplitude: f64,
    /// `atan2(imaginary, real)`, or 0 for a near-zero bin.
    pub phase: f64,
}

impl SpectralBin {
    fn from_parts(frequency_index: usize, real: f64, imaginary: f64) -> Self {
        let amplitude = (real * real + imaginary * imaginary).sqrt();
        let phase = if amplitude > PHASE_EPSILON {
            imaginary.atan2(real)
        } else {
            0.0
        };
        SpectralBin {
            frequency_index,
            real,
            imaginary,
            amplitude,
            phase,
        }
    }
}

/// Scale factor for bin `k` of an `n`-point transform.
pub fn bin_scale(k: usize, n: usize) -> f64 {
    let is_nyquist = n % 2 == 0 && k == n / 2;
    if k == 0 || is_nyquist {
        1.0 / n as f64
    } else {
        2.0 / n as f64
    }
}

/// Compute the full `N`-bin spectrum of `signal`. An empty signal gives an
/// empty spectrum.
pub fn compute_dft(signal: &[f64]) -> Vec<SpectralBin> {
    let n = signal.len();
    let spectrum: Vec<SpectralBin> = (0..n)
        .map(|k| {
            let mut real = 0.0;
            let mut imag = 0.0;
            for (i, &x) in signal.iter().enumerate() {
                let angle = (-2.0 * PI * k as f64 * i as f64) / n as f64;
                real += x * angle.cos();
                imag += x * angle.sin();
            }
            let scale = bin_scale(k, n);
            SpectralBin::from_parts(k, real * scale, imag * scale)
        })
        .collect();
    log::debug!("computed {}-bin DFT", spectrum.len());
    spectrum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(got: f64, want: f64, tol: f64, what: &str) {
        assert!((got - want).abs() <= tol, "{what}: got {got}, want {want}");
    }

    #[test]
    fn empty_signal() {
        assert!(compute_dft(&[]).is_empty());
    }

    #[test]
    fn single_sample_is_dc() {
        let spectrum = compute_dft(&[3.5]);
        assert_eq!(spectrum.len(), 1);
        assert_close(spectrum[0].amplitude, 3.5, 1e-12, "dc");
    }

    #[test]
    fn dc_only() {
        let spectrum = compute_dft(&vec![-2.0; 64]);
        assert_close(spectrum[0].amplitude, 2.0, 1e-12, "dc amplitude");
        assert_close(spectrum[0].real, -2.0, 1e-12, "dc real");
        for bin in &spectrum[1..] {
            assert!(bin.amplitude < 1e-9, "bin {} leaked {}", bin.frequency_index, bin.amplitude);
        }
    }

    #[test]
    fn cosine_at_quarter_bin_uses_two_over_n() {
        let n = 64;
        let k0 = n / 4;
        let signal: Vec<f64> = (0..n)
            .map(|i| 1.5 * (2.0 * PI * k0 as f64 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = compute_dft(&signal);
        assert_close(spectrum[k0].amplitude, 1.5, 1e-9, "bin N/4 amplitude");
        assert_close(spectrum[k0].phase, 0.0, 1e-9, "bin N/4 phase");
        // mirrored bin carries the same single-sided scaling
        assert_close(spectrum[n - k0].amplitude, 1.5, 1e-9, "bin 3N/4 amplitude");
        assert!(spectrum[0].amplitude < 1e-9);
        assert!(spectrum[n / 2].amplitude < 1e-9);
    }

    #[test]
    fn nyquist_uses_one_over_n() {
        let n = 32;
        let signal: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let spectrum = compute_dft(&signal);
        assert_close(spectrum[n / 2].amplitude, 1.0, 1e-9, "nyquist amplitude");
        assert_close(spectrum[n / 2].real, 1.0, 1e-9, "nyquist real");
    }

    #[test]
    fn odd_length_has_no_nyquist_bin() {
        assert_eq!(bin_scale(0, 7), 1.0 / 7.0);
        assert_eq!(bin_scale(3, 7), 2.0 / 7.0);
        assert_eq!(bin_scale(4, 8), 1.0 / 8.0);
        assert_eq!(bin_scale(3, 8), 2.0 / 8.0);
    }

    #[test]
    fn sine_has_minus_half_pi_phase() {
        let n = 128;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 8.0 * i as f64 / n as f64).sin())
            .collect();
        let spectrum = compute_dft(&signal);
        assert_close(spectrum[8].amplitude, 1.0, 1e-9, "amplitude");
        assert_close(spectrum[8].phase, -PI / 2.0, 1e-9, "phase");
    }

    #[test]
    fn zero_bins_have_zero_phase() {
        let spectrum = compute_dft(&[0.0; 16]);
        assert!(spectrum.iter().all(|b| b.phase == 0.0 && b.amplitude == 0.0));
    }

    #[test]
    fn linearity() {
        let n = 48;
        let x: Vec<f64> = (0..n).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
        let y: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        let sum: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a + b).collect();

        let dx = compute_dft(&x);
        let dy = compute_dft(&y);
        let ds = compute_dft(&sum);
        for k in 0..n {
            let re = dx[k].real + dy[k].real;
            let im = dx[k].imaginary + dy[k].imaginary;
            let tol = 1e-9 * (1.0 + re.abs().max(im.abs()));
            assert_close(ds[k].real, re, tol, "real");
            assert_close(ds[k].imaginary, im, tol, "imaginary");
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let copy = signal.clone();
        let _ = compute_dft(&signal);
        assert_eq!(signal, copy);
    }
}
