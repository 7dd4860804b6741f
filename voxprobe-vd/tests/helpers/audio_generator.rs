//! Audio Test Fixture Generator
//!
//! Builds small in-memory clips: WAV via hound (the decoder sniffs the
//! container), and silent MPEG-1 Layer III streams assembled frame by frame.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Cursor;

/// Signal shape
#[derive(Debug, Clone, Copy)]
pub enum Waveform {
    /// Constant-frequency sine
    Tone { frequency_hz: f64 },
    /// Linear frequency sweep
    Glide { start_hz: f64, end_hz: f64 },
    Silence,
}

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub amplitude: f64,
    pub waveform: Waveform,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 22050,
            amplitude: 0.1,
            waveform: Waveform::Tone { frequency_hz: 220.0 },
        }
    }
}

impl AudioConfig {
    pub fn tone(frequency_hz: f64) -> Self {
        Self {
            waveform: Waveform::Tone { frequency_hz },
            ..Default::default()
        }
    }

    pub fn silence() -> Self {
        Self {
            waveform: Waveform::Silence,
            ..Default::default()
        }
    }

    pub fn glide(start_hz: f64, end_hz: f64) -> Self {
        Self {
            duration_seconds: 2.0,
            waveform: Waveform::Glide { start_hz, end_hz },
            ..Default::default()
        }
    }
}

/// Generate a mono 16-bit WAV file in memory
pub fn generate_wav_bytes(config: &AudioConfig) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;
        let sr = config.sample_rate as f64;

        let mut phase = 0.0f64;
        for i in 0..total_samples {
            let t = i as f64 / sr;
            let frequency = match config.waveform {
                Waveform::Tone { frequency_hz } => frequency_hz,
                Waveform::Glide { start_hz, end_hz } => {
                    start_hz + (end_hz - start_hz) * t / config.duration_seconds
                }
                Waveform::Silence => 0.0,
            };
            phase += 2.0 * std::f64::consts::PI * frequency / sr;

            let value = match config.waveform {
                Waveform::Silence => 0.0,
                _ => config.amplitude * phase.sin(),
            };
            writer.write_sample((value * i16::MAX as f64) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// MPEG-1 Layer III, no CRC, 128 kbit/s, 44.1 kHz, no padding, mono
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];

/// 144 * 128000 / 44100, rounded down
const MP3_FRAME_LENGTH: usize = 417;

/// Samples per Layer III frame
pub const MP3_SAMPLES_PER_FRAME: usize = 1152;

/// Silent MP3 stream of `frames` frames
///
/// Zeroed side information means no main data and zero gain, so every
/// granule decodes to digital silence.
pub fn generate_silent_mp3(frames: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frames * MP3_FRAME_LENGTH);
    for _ in 0..frames {
        bytes.extend_from_slice(&MP3_FRAME_HEADER);
        bytes.resize(bytes.len() + MP3_FRAME_LENGTH - MP3_FRAME_HEADER.len(), 0);
    }
    bytes
}
