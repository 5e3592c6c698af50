//! Full analysis pipeline: sample → DFT → significance filter → reconstruction,
//! plus the chart projections and summary the UI displays.
//!
//! Each call recomputes everything from its arguments; nothing is cached.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::SignalConfig;
use crate::dsp::chart::{
    calculate_optimal_frequency_range, generate_frequency_data, generate_time_data,
    FrequencyPoint, FrequencyRange, TimePoint,
};
use crate::dsp::dft::{compute_dft, SpectralBin};
use crate::dsp::reconstruct::reconstruct_expression_with_tolerance;
use crate::dsp::signal::{
    generate_signal_from_components, generate_signal_from_expression, FrequencyComponent,
};
use crate::dsp::significance::{extract_significant_frequencies, SignificantComponent};
use crate::dsp::stats::{calculate_signal_stats, SignalStats};
use crate::error::FourierError;

/// How the time-domain signal is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SignalSource {
    /// Sum of sinusoids. Components are sanitized before sampling.
    Components { components: Vec<FrequencyComponent> },
    /// Free-form expression of `t`.
    Expression { expression: String },
}

impl SignalSource {
    /// Sample this source on the grid described by `config`.
    pub fn sample(&self, config: &SignalConfig) -> Result<Vec<f64>, FourierError> {
        match self {
            SignalSource::Components { components } => {
                let clean: Vec<FrequencyComponent> = components
                    .iter()
                    .map(|c| c.sanitized(config.max_frequency))
                    .collect();
                Ok(generate_signal_from_components(
                    config.sample_count,
                    &clean,
                    config.x_start,
                    config.x_end,
                ))
            }
            SignalSource::Expression { expression } => generate_signal_from_expression(
                config.sample_count,
                expression,
                config.x_start,
                config.x_end,
            ),
        }
    }
}

/// One significant component as shown in the analysis table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentShare {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
    pub phase_degrees: f64,
    /// Share of total significant power, in percent.
    pub power_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumSummary {
    pub component_count: usize,
    /// Frequency of the strongest component.
    pub fundamental: Option<f64>,
    /// Highest significant frequency.
    pub highest_frequency: Option<f64>,
    pub nyquist: f64,
    pub shares: Vec<ComponentShare>,
}

impl SpectrumSummary {
    /// `components` are expected strongest first, as the significance filter returns them.
    pub fn new(components: &[SignificantComponent], sample_rate: f64) -> Self {
        let total_power: f64 = components.iter().map(|c| c.amplitude * c.amplitude).sum();
        let shares = components
            .iter()
            .map(|c| ComponentShare {
                frequency: c.frequency,
                amplitude: c.amplitude,
                phase: c.phase,
                phase_degrees: (c.phase * 180.0 / PI) % 360.0,
                power_percent: if total_power > 0.0 {
                    c.amplitude * c.amplitude / total_power * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        SpectrumSummary {
            component_count: components.len(),
            fundamental: components.first().map(|c| c.frequency),
            highest_frequency: components.iter().map(|c| c.frequency).reduce(f64::max),
            nyquist: sample_rate / 2.0,
            shares,
        }
    }
}

/// Everything computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub sample_rate: f64,
    pub signal: Vec<f64>,
    pub spectrum: Vec<SpectralBin>,
    /// Strongest first. Empty when nothing stands out.
    pub significant: Vec<SignificantComponent>,
    pub reconstructed_expression: String,
    pub stats: SignalStats,
    pub time_data: Vec<TimePoint>,
    pub frequency_data: Vec<FrequencyPoint>,
    pub frequency_range: FrequencyRange,
    pub summary: SpectrumSummary,
}

/// Run the whole pipeline for `source` under `config`. Fails on an
/// invalid expression or a zero-width or non-finite interval.
pub fn analyze(source: &SignalSource, config: &SignalConfig) -> Result<Analysis, FourierError> {
    config.validate()?;
    let signal = source.sample(config)?;
    let sample_rate = config.sample_rate();

    let spectrum = compute_dft(&signal);
    let significant =
        extract_significant_frequencies(&spectrum, sample_rate, config.significance_threshold);
    let reconstructed_expression = reconstruct_expression_with_tolerance(
        &significant,
        config.min_amplitude_threshold,
        config.phase_tolerance,
    );

    let frequency_data = generate_frequency_data(&spectrum, sample_rate);
    let frequency_range = calculate_optimal_frequency_range(&frequency_data, config.max_frequency);

    log::debug!(
        "analysis: {} samples at {sample_rate} Hz, {} significant components",
        signal.len(),
        significant.len()
    );

    Ok(Analysis {
        sample_rate,
        stats: calculate_signal_stats(&signal),
        time_data: generate_time_data(&signal, config.x_start, config.x_end),
        summary: SpectrumSummary::new(&significant, sample_rate),
        signal,
        spectrum,
        significant,
        reconstructed_expression,
        frequency_data,
        frequency_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(list: &[(f64, f64, f64)]) -> SignalSource {
        SignalSource::Components {
            components: list
                .iter()
                .map(|&(f, a, p)| FrequencyComponent::new(f, a, p))
                .collect(),
        }
    }

    #[test]
    fn single_sine_round_trip() {
        let analysis = analyze(&components(&[(5.0, 1.0, 0.0)]), &SignalConfig::default()).unwrap();
        assert_eq!(analysis.signal.len(), 512);
        assert_eq!(analysis.spectrum.len(), 512);
        assert_eq!(analysis.sample_rate, 512.0);
        assert_eq!(analysis.significant.len(), 1, "got {:?}", analysis.significant);

        let c = &analysis.significant[0];
        assert_eq!(c.frequency, 5.0);
        assert!((c.amplitude - 1.0).abs() < 0.02, "amplitude {}", c.amplitude);
        assert!((c.phase + PI / 2.0).abs() < 0.1, "phase {}", c.phase);
        assert_eq!(
            analysis.reconstructed_expression,
            "1.000 \\sin(2\\pi \\cdot 5.0 \\cdot t)"
        );
    }

    #[test]
    fn components_are_sanitized() {
        let config = SignalConfig {
            max_frequency: 10.0,
            ..SignalConfig::default()
        };
        let analysis = analyze(&components(&[(40.0, 50.0, 0.0)]), &config).unwrap();
        let peak = analysis.signal.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        assert!(peak <= 10.0 + 1e-9, "amplitude was not clamped: {peak}");
        assert_eq!(analysis.significant[0].frequency, 10.0);
    }

    #[test]
    fn empty_components() {
        let analysis = analyze(&components(&[]), &SignalConfig::default()).unwrap();
        assert!(analysis.signal.iter().all(|&x| x == 0.0));
        assert!(analysis.significant.is_empty());
        assert_eq!(analysis.reconstructed_expression, "0");
        assert_eq!(analysis.summary.component_count, 0);
        assert_eq!(analysis.summary.fundamental, None);
        assert_eq!(analysis.frequency_range.max, 20.0);
    }

    #[test]
    fn expression_mode() {
        let source = SignalSource::Expression {
            expression: "2 + 3 cos(2 pi * 8 t)".into(),
        };
        let analysis = analyze(&source, &SignalConfig::default()).unwrap();
        let bins: Vec<usize> = analysis.significant.iter().map(|c| c.bin).collect();
        assert_eq!(&bins[..2], &[8, 0]);
        assert!((analysis.significant[1].amplitude - 2.0).abs() < 0.05);
        assert!((analysis.stats.max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_expression_propagates() {
        let source = SignalSource::Expression {
            expression: "2 +* t".into(),
        };
        let err = analyze(&source, &SignalConfig::default()).unwrap_err();
        assert!(matches!(err, FourierError::InvalidExpression(_)));
    }

    #[test]
    fn zero_width_interval_is_rejected() {
        let config = SignalConfig {
            x_start: 1.0,
            x_end: 1.0,
            ..SignalConfig::default()
        };
        let source = SignalSource::Expression {
            expression: "2".into(),
        };
        let err = analyze(&source, &config).unwrap_err();
        assert!(matches!(err, FourierError::InvalidInterval { .. }), "got {err:?}");
        assert_eq!(
            err.to_string(),
            "Invalid sampling interval [1, 1]: ends must be finite and distinct"
        );
    }

    #[test]
    fn summary_shares() {
        let significant = [
            SignificantComponent {
                frequency: 3.0,
                bin: 3,
                real: 0.0,
                imaginary: -2.0,
                amplitude: 2.0,
                phase: -PI / 2.0,
            },
            SignificantComponent {
                frequency: 9.0,
                bin: 9,
                real: 1.0,
                imaginary: 0.0,
                amplitude: 1.0,
                phase: 0.0,
            },
        ];
        let summary = SpectrumSummary::new(&significant, 64.0);
        assert_eq!(summary.component_count, 2);
        assert_eq!(summary.fundamental, Some(3.0));
        assert_eq!(summary.highest_frequency, Some(9.0));
        assert_eq!(summary.nyquist, 32.0);
        assert!((summary.shares[0].power_percent - 80.0).abs() < 1e-9);
        assert!((summary.shares[1].power_percent - 20.0).abs() < 1e-9);
        assert!((summary.shares[0].phase_degrees + 90.0).abs() < 1e-9);
    }

    #[test]
    fn source_json_shape() {
        let source: SignalSource =
            serde_json::from_str(r#"{"mode": "expression", "expression": "sin(t)"}"#).unwrap();
        assert_eq!(
            source,
            SignalSource::Expression {
                expression: "sin(t)".into()
            }
        );
        let source: SignalSource = serde_json::from_str(
            r#"{"mode": "components", "components": [{"freq": 1, "amp": 2}]}"#,
        )
        .unwrap();
        assert_eq!(source, components(&[(1.0, 2.0, 0.0)]));
    }
}
