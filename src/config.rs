//! Startup parameters for a voice.
//!
//! The engine itself never validates its inputs; [`SynthConfig::validate`] is
//! the boundary where out-of-range values are rejected before they reach it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;
use thiserror::Error;

use crate::{dsp::InterpolationMode, DEFAULT_BUFFER_SIZE, MAX_BLOCK_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample rate must be positive, got {0}")]
    SampleRate(f32),
    #[error("buffer size must be in 1..={max}, got {got}")]
    BufferSize { got: usize, max: usize },
    #[error("frequency must be positive, got {0}")]
    Frequency(f32),
    #[error("fine tune must be in [-1, 1], got {0}")]
    FineTune(f32),
    #[error("note-off time must be in (0, 1], got {0}")]
    NoteOffTime(f32),
    #[error("smoothing must be in [0, 1], got {0}")]
    Smoothing(f32),
    #[cfg(feature = "serde")]
    #[error("could not read config file")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("malformed config")]
    Parse(#[from] toml::de::Error),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz
    pub sample_rate: f32,
    /// Frames per render buffer; also scales the speaker protection window
    pub buffer_size: usize,
    pub frequency: f32,
    /// Whole semitones
    pub tune: i32,
    /// Fractional semitones, -1.0..=1.0
    pub fine_tune: f32,
    pub interpolation: InterpolationMode,
    /// Release fade as a fraction of one period
    pub note_off_time: f32,
    pub smoothing: f32,
    pub speaker_protection: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            buffer_size: DEFAULT_BUFFER_SIZE,
            frequency: 440.0,
            tune: 0,
            fine_tune: 0.0,
            interpolation: InterpolationMode::Linear,
            note_off_time: 0.5,
            smoothing: 0.0,
            speaker_protection: true,
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_size(mut self, frames: usize) -> Self {
        self.buffer_size = frames;
        self
    }

    pub fn with_frequency(mut self, hz: f32) -> Self {
        self.frequency = hz;
        self
    }

    pub fn with_tune(mut self, semitones: i32, fine: f32) -> Self {
        self.tune = semitones;
        self.fine_tune = fine;
        self
    }

    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    pub fn with_note_off_time(mut self, fraction: f32) -> Self {
        self.note_off_time = fraction;
        self
    }

    pub fn with_smoothing(mut self, amount: f32) -> Self {
        self.smoothing = amount;
        self
    }

    pub fn with_speaker_protection(mut self, enabled: bool) -> Self {
        self.speaker_protection = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if self.buffer_size == 0 || self.buffer_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::BufferSize {
                got: self.buffer_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if !(self.frequency > 0.0) || !self.frequency.is_finite() {
            return Err(ConfigError::Frequency(self.frequency));
        }
        if !(-1.0..=1.0).contains(&self.fine_tune) {
            return Err(ConfigError::FineTune(self.fine_tune));
        }
        if !(self.note_off_time > 0.0 && self.note_off_time <= 1.0) {
            return Err(ConfigError::NoteOffTime(self.note_off_time));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl SynthConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: SynthConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        log::info!(target: "config", "loaded {}", path.display());
        Ok(config)
    }
}
