//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from inside an audio callback. They stay focused on the
//! signal-processing math; triggering, protection and the control path live
//! in [`crate::synth`].

/// Segment shaping curves and linear interpolation.
pub mod interpolate;
/// One-pole smoothing filter for stepped edges.
pub mod smoothing;
/// Bounded vertex types and the ordered vertex set.
pub mod vertex;
/// Per-sample vertex waveform generator.
pub mod waveform;

pub use interpolate::InterpolationMode;
pub use vertex::{Amplitude, Phase, Vertex, VertexError, VertexSet};
pub use waveform::WaveformEngine;
