//! Acoustic feature extraction
//!
//! Pure functions of (waveform, sample rate); no I/O, no shared state.

pub mod features;
pub mod pitch;

pub use features::{extract_features, std_dev, FeatureSet};
pub use pitch::{PitchConfig, YinTracker};

use thiserror::Error;

/// Feature extraction errors
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Waveform is empty")]
    EmptyWaveform,

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Invalid pitch configuration: {0}")]
    InvalidConfig(String),

    #[error("FFT failed: {0}")]
    Fft(String),
}
