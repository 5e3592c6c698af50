//! Signal sampler: turns a signal definition into uniformly spaced samples.
//!
//! Samples cover `[x_start, x_end]` inclusive at both ends, so the step is
//! `(x_end - x_start) / (sample_count - 1)`.

use std::f64::consts::PI;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::compiler::{self, CompiledExpression, EVAL_FALLBACK};
use crate::config::{MAX_AMPLITUDE, MAX_FREQUENCY};
use crate::error::FourierError;

/// One sinusoid: `amp * sin(2π·freq·t + phase)`.
///
/// Deserialization is lenient: numeric strings are read by their leading
/// number, and missing or unreadable fields become 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyComponent {
    /// Frequency in Hz.
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub freq: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub amp: f64,
    /// Phase offset in radians.
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub phase: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LenientNumber::deserialize(deserializer)? {
        LenientNumber::Number(n) => n,
        LenientNumber::Text(text) => parse_leading_number(&text),
        LenientNumber::Other(_) => 0.0,
    };
    Ok(if value.is_nan() { 0.0 } else { value })
}

/// Longest numeric prefix of `text` after leading whitespace, or 0.
fn parse_leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

impl FrequencyComponent {
    pub fn new(freq: f64, amp: f64, phase: f64) -> Self {
        FrequencyComponent { freq, amp, phase }
    }

    /// Clamp `freq` to `[0, max_frequency]` and `amp` to `[0, MAX_AMPLITUDE]`.
    /// NaN fields become 0; the phase is kept unless it is not finite.
    pub fn sanitized(&self, max_frequency: f64) -> Self {
        FrequencyComponent {
            freq: clamp_or_zero(self.freq, max_frequency),
            amp: clamp_or_zero(self.amp, MAX_AMPLITUDE),
            phase: if self.phase.is_finite() { self.phase } else { 0.0 },
        }
    }

    /// Value of this sinusoid at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        self.amp * (2.0 * PI * self.freq * t + self.phase).sin()
    }
}

fn clamp_or_zero(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

/// Sanitize a component against the default [`MAX_FREQUENCY`].
pub fn sanitize_frequency_component(component: &FrequencyComponent) -> FrequencyComponent {
    component.sanitized(MAX_FREQUENCY)
}

/// The uniform sampling grid. A single sample sits at `x_start`.
pub fn sample_times(sample_count: usize, x_start: f64, x_end: f64) -> impl Iterator<Item = f64> {
    let time_step = if sample_count > 1 {
        (x_end - x_start) / (sample_count - 1) as f64
    } else {
        0.0
    };
    (0..sample_count).map(move |n| x_start + n as f64 * time_step)
}

/// Sum of sinusoids sampled over `[x_start, x_end]`. An empty component
/// list yields the zero signal.
pub fn generate_signal_from_components(
    sample_count: usize,
    components: &[FrequencyComponent],
    x_start: f64,
    x_end: f64,
) -> Vec<f64> {
    let signal: Vec<f64> = sample_times(sample_count, x_start, x_end)
        .map(|t| components.iter().map(|c| c.value_at(t)).sum())
        .collect();
    log::debug!(
        "sampled {} points from {} components over [{x_start}, {x_end}]",
        signal.len(),
        components.len()
    );
    signal
}

/// Compile `expression` and sample it. Compilation errors surface before
/// any sample is produced.
pub fn generate_signal_from_expression(
    sample_count: usize,
    expression: &str,
    x_start: f64,
    x_end: f64,
) -> Result<Vec<f64>, FourierError> {
    let compiled = compiler::compile(expression)?;
    Ok(generate_signal_from_compiled(
        sample_count,
        &compiled,
        x_start,
        x_end,
    ))
}

/// Sample an already-compiled expression. Non-finite points become 0.
pub fn generate_signal_from_compiled(
    sample_count: usize,
    compiled: &CompiledExpression,
    x_start: f64,
    x_end: f64,
) -> Vec<f64> {
    let mut substituted = 0;
    let signal: Vec<f64> = sample_times(sample_count, x_start, x_end)
        .map(|t| {
            compiled.evaluate(t).unwrap_or_else(|| {
                substituted += 1;
                EVAL_FALLBACK
            })
        })
        .collect();

    if substituted > 0 {
        log::debug!(
            "expression `{}`: {substituted} of {} samples were not finite and were set to 0",
            compiled.source(),
            signal.len()
        );
    }
    signal
}
