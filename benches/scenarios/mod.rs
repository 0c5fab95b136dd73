//! Real-world scenario benchmarks.
//!
//! These model the audio callback: a full voice with smoothing and speaker
//! protection, fed by the control ring.

mod voice;

pub use voice::bench_voice;
