//! Benchmarks for low-level DSP primitives.

mod smoothing;
mod waveform;

pub use smoothing::bench_smoothing;
pub use waveform::bench_waveform;
