//! Signal and analysis configuration.
//!
//! Every field has a default, so a partial JSON object (e.g. `{"xEnd": 2}`)
//! only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::FourierError;

pub const DEFAULT_SAMPLE_COUNT: usize = 512;
pub const DEFAULT_X_START: f64 = 0.0;
pub const DEFAULT_X_END: f64 = 1.0;
/// Upper clamp for a component's frequency in Hz.
pub const MAX_FREQUENCY: f64 = 50.0;
/// Upper clamp for a component's amplitude.
pub const MAX_AMPLITUDE: f64 = 10.0;
pub const MIN_AMPLITUDE_THRESHOLD: f64 = 0.01;
/// Angular tolerance (radians) for snapping phases to sine/cosine forms.
pub const PHASE_TOLERANCE: f64 = 0.1;
/// Fraction of the spectrum peak a bin must exceed to be significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignalConfig {
    pub sample_count: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub max_frequency: f64,
    /// Minimum amplitude for a term to appear in the reconstructed expression.
    pub min_amplitude_threshold: f64,
    pub phase_tolerance: f64,
    /// Relative cutoff used by the significance filter.
    pub significance_threshold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            sample_count: DEFAULT_SAMPLE_COUNT,
            x_start: DEFAULT_X_START,
            x_end: DEFAULT_X_END,
            max_frequency: MAX_FREQUENCY,
            min_amplitude_threshold: MIN_AMPLITUDE_THRESHOLD,
            phase_tolerance: PHASE_TOLERANCE,
            significance_threshold: SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl SignalConfig {
    pub fn from_json(json: &str) -> Result<Self, FourierError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Samples per unit time: `sample_count / (x_end - x_start)`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_count as f64 / self.duration()
    }

    /// Duration of the sampled interval.
    pub fn duration(&self) -> f64 {
        self.x_end - self.x_start
    }

    /// Reject intervals that would give an infinite or NaN sample rate.
    pub fn validate(&self) -> Result<(), FourierError> {
        let duration = self.duration();
        if duration.is_finite() && duration != 0.0 {
            Ok(())
        } else {
            Err(FourierError::InvalidInterval {
                x_start: self.x_start,
                x_end: self.x_end,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SignalConfig::default();
        assert_eq!(config.sample_count, 512);
        assert_eq!(config.x_start, 0.0);
        assert_eq!(config.x_end, 1.0);
        assert_eq!(config.max_frequency, 50.0);
        assert_eq!(config.min_amplitude_threshold, 0.01);
        assert_eq!(config.phase_tolerance, 0.1);
        assert_eq!(config.sample_rate(), 512.0);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = SignalConfig::from_json(r#"{"sampleCount": 256, "xEnd": 2}"#).unwrap();
        assert_eq!(config.sample_count, 256);
        assert_eq!(config.x_end, 2.0);
        assert_eq!(config.x_start, 0.0);
        assert_eq!(config.phase_tolerance, PHASE_TOLERANCE);
        assert_eq!(config.sample_rate(), 128.0);
    }

    #[test]
    fn validate_interval() {
        assert!(SignalConfig::default().validate().is_ok());

        let reversed = SignalConfig {
            x_start: 1.0,
            x_end: -1.0,
            ..SignalConfig::default()
        };
        assert!(reversed.validate().is_ok());

        for (x_start, x_end) in [(1.0, 1.0), (0.0, f64::INFINITY), (f64::NAN, 1.0)] {
            let config = SignalConfig {
                x_start,
                x_end,
                ..SignalConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(err, FourierError::InvalidInterval { .. }), "got {err:?}");
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SignalConfig::from_json(r#"{"sampleCount": "many"}"#).unwrap_err();
        assert!(matches!(err, FourierError::Config(_)), "got {err:?}");
    }
}
