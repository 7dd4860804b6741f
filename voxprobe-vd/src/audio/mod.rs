//! Audio ingestion: base64 payload → PCM waveform

pub mod decoder;

pub use decoder::{
    decode_audio_bytes, decode_audio_file, decode_base64_audio, DecodeError, DecodedAudio,
};
