pub mod analysis;
pub mod ast;
pub mod compiler;
pub mod config;
pub mod dsp;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

pub use crate::analysis::{analyze, Analysis, SignalSource, SpectrumSummary};
pub use crate::config::SignalConfig;
pub use crate::dsp::chart::{
    calculate_optimal_frequency_range, generate_frequency_data, generate_time_data,
};
pub use crate::dsp::dft::{compute_dft, SpectralBin};
pub use crate::dsp::reconstruct::reconstruct_expression;
pub use crate::dsp::signal::{
    generate_signal_from_components, generate_signal_from_expression,
    sanitize_frequency_component, FrequencyComponent,
};
pub use crate::dsp::significance::{extract_significant_frequencies, SignificantComponent};
pub use crate::dsp::stats::{calculate_signal_stats, SignalStats};
pub use crate::error::FourierError;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the fourier-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Payload accepted by [`analyze_signal`].
#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    source: SignalSource,
    #[serde(default)]
    config: SignalConfig,
}

/// WASM-exposed: run the full analysis pipeline.
/// Takes `{ source: { mode, ... }, config?: {...} }` and returns the analysis
/// object. Errors are returned as their display message.
#[wasm_bindgen]
pub fn analyze_signal(request: JsValue) -> Result<JsValue, JsValue> {
    let request: AnalysisRequest =
        serde_wasm_bindgen::from_value(request).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let analysis = analyze(&request.source, &request.config)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&analysis).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: clamp a `{freq, amp, phase}` object. Numeric strings are
/// accepted and missing fields read as 0. `max_frequency` defaults to 50 Hz.
#[wasm_bindgen]
pub fn sanitize_component(component: JsValue, max_frequency: Option<f64>) -> Result<JsValue, JsValue> {
    let component: FrequencyComponent = serde_wasm_bindgen::from_value(component)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let clean = component.sanitized(max_frequency.unwrap_or(config::MAX_FREQUENCY));
    serde_wasm_bindgen::to_value(&clean).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: validate an expression as the user types.
/// On failure, returns a caret-annotated diagnostic.
#[wasm_bindgen]
pub fn check_expression(source: &str) -> Result<(), JsValue> {
    compiler::compile(source)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.report(source)))
}
