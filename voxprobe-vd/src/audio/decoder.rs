//! Audio Decoding Utilities
//!
//! **Purpose:** Turn an inbound base64 payload into mono f32 PCM at the
//! file's native sample rate (never resampled).
//!
//! Raw bytes are staged in a per-request temporary `.mp3` file which is
//! removed when the decode returns, on success and on every error path.
//! Uses symphonia for container probing and decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use thiserror::Error;

/// Extension given to the transient backing file (also the probe hint)
const STAGING_EXTENSION: &str = "mp3";

/// Decoding errors
///
/// `InvalidBase64` is kept apart from the codec failures so callers can
/// report the two differently.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid Base64 audio data")]
    InvalidBase64(#[source] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Codec(String),
}

/// Decoded audio result
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

/// Decode a base64 payload (standard alphabet, padded)
///
/// Surrounding whitespace is ignored; anything else outside the alphabet is
/// an error.
pub fn decode_base64_audio(audio_base64: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(audio_base64.trim())
        .map_err(DecodeError::InvalidBase64)
}

/// Decode compressed audio bytes via a transient file in the system temp dir
pub fn decode_audio_bytes(bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
    decode_audio_bytes_in(&std::env::temp_dir(), bytes)
}

/// Decode compressed audio bytes via a transient file created in `dir`
///
/// The file is owned by the returned-from scope: `NamedTempFile` deletes it
/// on drop, which covers early `?` returns as well.
pub fn decode_audio_bytes_in(dir: &Path, bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
    let mut staged = tempfile::Builder::new()
        .prefix("voxprobe-")
        .suffix(&format!(".{}", STAGING_EXTENSION))
        .tempfile_in(dir)?;

    staged.write_all(bytes)?;
    staged.flush()?;

    tracing::debug!(
        path = %staged.path().display(),
        bytes = bytes.len(),
        "Staged audio payload"
    );

    decode_audio_file(staged.path())
}

/// Decode audio file to mono f32 PCM samples
///
/// **Algorithm:**
/// 1. Open file and probe format using symphonia
/// 2. Find default audio track
/// 3. Create decoder for track codec
/// 4. Decode all packets to PCM samples (corrupt packets are skipped)
/// 5. Convert multi-channel to mono (average channels)
/// 6. Return mono f32 samples + native sample rate
pub fn decode_audio_file(file_path: &Path) -> Result<DecodedAudio, DecodeError> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Codec(format!("Failed to probe audio: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::Codec("No audio track found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channel_count = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(format!("Failed to create decoder: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(DecodeError::Codec(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                tracing::debug!(error = msg, "Skipping corrupt packet");
                continue;
            }
            Err(e) => {
                return Err(DecodeError::Codec(format!("Failed to decode packet: {}", e)));
            }
        };

        let spec = decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channel_count.get_or_insert(spec.channels.count());

        all_samples.extend(convert_to_mono_f32(&decoded));
    }

    let sample_rate = sample_rate
        .filter(|rate| *rate > 0)
        .ok_or_else(|| DecodeError::Codec("Sample rate unknown".to_string()))?;

    if all_samples.is_empty() {
        return Err(DecodeError::Codec("No audio samples decoded".to_string()));
    }

    let duration_seconds = all_samples.len() as f64 / sample_rate as f64;

    tracing::debug!(
        total_samples = all_samples.len(),
        sample_rate,
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
        channels: channel_count.unwrap_or(1),
        duration_seconds,
    })
}

/// Convert audio buffer to mono f32 samples by averaging channels
fn convert_to_mono_f32(decoded: &AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::U8(buf) => mix_to_mono(&**buf),
        AudioBufferRef::U16(buf) => mix_to_mono(&**buf),
        AudioBufferRef::U24(buf) => mix_to_mono(&**buf),
        AudioBufferRef::U32(buf) => mix_to_mono(&**buf),
        AudioBufferRef::S8(buf) => mix_to_mono(&**buf),
        AudioBufferRef::S16(buf) => mix_to_mono(&**buf),
        AudioBufferRef::S24(buf) => mix_to_mono(&**buf),
        AudioBufferRef::S32(buf) => mix_to_mono(&**buf),
        AudioBufferRef::F32(buf) => mix_to_mono(&**buf),
        AudioBufferRef::F64(buf) => mix_to_mono(&**buf),
    }
}

fn mix_to_mono<S: Sample>(buf: &AudioBuffer<S>) -> Vec<f32>
where
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return Vec::new();
    }

    (0..buf.frames())
        .map(|frame_idx| {
            let sum: f32 = (0..num_channels)
                .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
                .sum();
            sum / num_channels as f32
        })
        .collect()
}
