//! Test Helper Utilities
//!
//! Shared utilities for testing voxprobe-vd

pub mod audio_generator;

pub use audio_generator::{
    encode_base64, generate_silent_mp3, generate_wav_bytes, AudioConfig, Waveform,
    MP3_SAMPLES_PER_FRAME,
};
