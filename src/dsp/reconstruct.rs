//! Expression reconstructor: renders significant components as a LaTeX
//! sum of trigonometric terms.
//!
//! The output is for display only and is never parsed back.

use std::f64::consts::{PI, TAU};

use super::significance::SignificantComponent;
use crate::config::PHASE_TOLERANCE;

/// Canonical shape of one reconstructed term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermForm {
    /// Constant (DC) term.
    Constant,
    /// Phase ≈ 0: `A cos(2π f t)`.
    Cosine,
    /// Phase ≈ π/2: `-A sin(2π f t)`.
    NegativeSine,
    /// Phase ≈ 3π/2: `A sin(2π f t)`.
    PositiveSine,
    /// Anything else: `A cos(2π f t + φ)` with φ in `[0, 2π)`.
    Shifted(f64),
}

/// Fold a phase into `[0, 2π)`.
pub fn normalize_phase(phase: f64) -> f64 {
    ((phase % TAU) + TAU) % TAU
}

/// Classify a component into its canonical term form.
pub fn classify(frequency: f64, phase: f64, tolerance: f64) -> TermForm {
    if frequency == 0.0 {
        return TermForm::Constant;
    }

    let phase = normalize_phase(phase);
    if phase.abs() < tolerance {
        TermForm::Cosine
    } else if (phase - PI / 2.0).abs() < tolerance {
        TermForm::NegativeSine
    } else if (phase + PI / 2.0).abs() < tolerance || (phase - 3.0 * PI / 2.0).abs() < tolerance {
        TermForm::PositiveSine
    } else {
        TermForm::Shifted(phase)
    }
}

/// Non-finite values are rendered as 0.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn render_term(component: &SignificantComponent, tolerance: f64) -> String {
    let frequency = finite_or_zero(component.frequency);
    let amp = format!("{:.3}", finite_or_zero(component.amplitude));
    let freq = format!("{frequency:.1}");

    match classify(frequency, finite_or_zero(component.phase), tolerance) {
        TermForm::Constant => amp,
        TermForm::Cosine => format!("{amp} \\cos(2\\pi \\cdot {freq} \\cdot t)"),
        TermForm::NegativeSine => format!("-{amp} \\sin(2\\pi \\cdot {freq} \\cdot t)"),
        TermForm::PositiveSine => format!("{amp} \\sin(2\\pi \\cdot {freq} \\cdot t)"),
        TermForm::Shifted(phase) => {
            format!("{amp} \\cos(2\\pi \\cdot {freq} \\cdot t + {phase:.2})")
        }
    }
}

/// Render with an explicit phase-snapping tolerance.
pub fn reconstruct_expression_with_tolerance(
    components: &[SignificantComponent],
    threshold: f64,
    tolerance: f64,
) -> String {
    let terms: Vec<String> = components
        .iter()
        .filter(|c| c.amplitude >= threshold)
        .map(|c| render_term(c, tolerance))
        .collect();

    if terms.is_empty() {
        return "0".to_string();
    }
    terms.join(" + ").replace("+ -", "- ")
}

/// Render components whose amplitude is at least `threshold`, in the order
/// given. Yields `"0"` when nothing qualifies.
pub fn reconstruct_expression(components: &[SignificantComponent], threshold: f64) -> String {
    reconstruct_expression_with_tolerance(components, threshold, PHASE_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_AMPLITUDE_THRESHOLD;

    fn render(components: &[SignificantComponent]) -> String {
        reconstruct_expression(components, MIN_AMPLITUDE_THRESHOLD)
    }

    fn component(frequency: f64, amplitude: f64, phase: f64) -> SignificantComponent {
        SignificantComponent {
            frequency,
            bin: 0,
            real: amplitude * phase.cos(),
            imaginary: amplitude * phase.sin(),
            amplitude,
            phase,
        }
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(reconstruct_expression(&[], 0.01), "0");
    }

    #[test]
    fn all_below_threshold_is_zero() {
        let components = [component(5.0, 0.005, 0.0), component(3.0, 0.001, 1.0)];
        assert_eq!(reconstruct_expression(&components, 0.01), "0");
    }

    #[test]
    fn threshold_is_inclusive() {
        let components = [component(2.0, 0.5, 0.0)];
        assert_eq!(
            reconstruct_expression(&components, 0.5),
            "0.500 \\cos(2\\pi \\cdot 2.0 \\cdot t)"
        );
    }

    #[test]
    fn dc_term() {
        assert_eq!(render(&[component(0.0, 1.25, PI)]), "1.250");
    }

    #[test]
    fn zero_phase_is_cosine() {
        assert_eq!(
            render(&[component(5.0, 1.0, 0.0)]),
            "1.000 \\cos(2\\pi \\cdot 5.0 \\cdot t)"
        );
    }

    #[test]
    fn half_pi_is_negative_sine() {
        assert_eq!(
            render(&[component(5.0, 2.0, PI / 2.0)]),
            "-2.000 \\sin(2\\pi \\cdot 5.0 \\cdot t)"
        );
    }

    #[test]
    fn minus_half_pi_is_positive_sine() {
        assert_eq!(
            render(&[component(12.5, 0.75, -PI / 2.0)]),
            "0.750 \\sin(2\\pi \\cdot 12.5 \\cdot t)"
        );
    }

    #[test]
    fn general_phase_is_shifted_cosine() {
        assert_eq!(
            render(&[component(3.0, 1.0, 1.0)]),
            "1.000 \\cos(2\\pi \\cdot 3.0 \\cdot t + 1.00)"
        );
        // negative phases are shown folded into [0, 2π)
        assert_eq!(
            render(&[component(3.0, 1.0, -1.0)]),
            "1.000 \\cos(2\\pi \\cdot 3.0 \\cdot t + 5.28)"
        );
    }

    #[test]
    fn tolerance_window() {
        assert_eq!(classify(1.0, 0.09, 0.1), TermForm::Cosine);
        assert_eq!(classify(1.0, PI / 2.0 + 0.05, 0.1), TermForm::NegativeSine);
        assert_eq!(classify(1.0, 3.0 * PI / 2.0 - 0.05, 0.1), TermForm::PositiveSine);
        assert!(matches!(classify(1.0, 0.2, 0.1), TermForm::Shifted(_)));
        assert!(matches!(classify(1.0, 0.2, 0.25), TermForm::Cosine));
    }

    #[test]
    fn terms_are_joined_and_signs_collapsed() {
        let components = [
            component(5.0, 1.0, 0.0),
            component(2.0, 0.5, PI / 2.0),
            component(0.0, 0.25, 0.0),
        ];
        assert_eq!(
            render(&components),
            "1.000 \\cos(2\\pi \\cdot 5.0 \\cdot t) - 0.500 \\sin(2\\pi \\cdot 2.0 \\cdot t) + 0.250"
        );
    }

    #[test]
    fn non_finite_fields_render_as_zero() {
        let dc = component(f64::NAN, 2.0, 0.0);
        assert_eq!(render(&[dc]), "2.000");

        let odd = SignificantComponent {
            frequency: 4.0,
            bin: 4,
            real: 0.0,
            imaginary: 0.0,
            amplitude: f64::INFINITY,
            phase: f64::NAN,
        };
        assert_eq!(
            reconstruct_expression(&[odd], 0.01),
            "0.000 \\cos(2\\pi \\cdot 4.0 \\cdot t)"
        );
    }

    #[test]
    fn normalize_phase_range() {
        assert_eq!(normalize_phase(0.0), 0.0);
        assert!((normalize_phase(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((normalize_phase(5.0 * PI) - PI).abs() < 1e-12);
        // tiny negative phases fold to 0 rather than 2π
        assert_eq!(normalize_phase(-1e-17), 0.0);
    }
}
