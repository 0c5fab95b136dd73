pub mod config; // Startup parameters and validation
pub mod dsp;
pub mod io;
pub mod synth; // Voice, speaker protection, control path

pub use config::{ConfigError, SynthConfig};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Render buffer length the speaker protection window is measured in.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
