//! Signal engine: sampling, spectral analysis, and reconstruction.
//!
//! Every function here is pure: inputs are borrowed, outputs are new values,
//! and identical inputs always produce identical outputs.

pub mod chart;
pub mod dft;
pub mod reconstruct;
pub mod signal;
pub mod significance;
pub mod stats;
