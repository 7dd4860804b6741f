//! Detection pipeline: base64 → PCM → features → verdict
//!
//! Every failure here is local to one request and reported once, in-band;
//! nothing is retried.

use thiserror::Error;

use crate::analysis::{extract_features, FeatureError, FeatureSet, PitchConfig};
use crate::audio::{decode_audio_bytes, decode_base64_audio, DecodeError};
use crate::models::{ClassificationResult, DetectionResponse};

use super::classifier::{Classifier, ClassifierParams};

/// Failures reported in-band (HTTP 200 with an error body)
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid Base64 audio data")]
    InvalidBase64,

    #[error("Audio processing error: {0}")]
    Processing(String),

    #[error("File upload error: {0}")]
    Upload(String),
}

impl From<DecodeError> for PipelineError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidBase64(_) => PipelineError::InvalidBase64,
            other => PipelineError::Processing(other.to_string()),
        }
    }
}

impl From<FeatureError> for PipelineError {
    fn from(err: FeatureError) -> Self {
        PipelineError::Processing(err.to_string())
    }
}

impl From<PipelineError> for DetectionResponse {
    fn from(err: PipelineError) -> Self {
        DetectionResponse::error(err.to_string())
    }
}

/// Stateless detection pipeline shared by every request
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    pitch: PitchConfig,
    classifier: Classifier,
}

impl DetectionPipeline {
    pub fn new(pitch: PitchConfig, params: ClassifierParams) -> Self {
        Self {
            pitch,
            classifier: Classifier::new(params),
        }
    }

    /// Features and verdict for an already-decoded waveform
    pub fn classify_waveform(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<(FeatureSet, ClassificationResult), FeatureError> {
        let features = extract_features(samples, sample_rate, &self.pitch)?;
        let result = self
            .classifier
            .classify(features.pitch_variation, features.energy_variation);
        Ok((features, result))
    }

    /// Decode a base64 payload and classify it
    pub fn analyze(
        &self,
        audio_base64: &str,
    ) -> Result<(FeatureSet, ClassificationResult), PipelineError> {
        let bytes = decode_base64_audio(audio_base64)?;
        let audio = decode_audio_bytes(&bytes)?;

        tracing::debug!(
            sample_rate = audio.sample_rate,
            channels = audio.channels,
            duration_seconds = format!("{:.2}", audio.duration_seconds),
            "Payload decoded"
        );

        Ok(self.classify_waveform(&audio.samples, audio.sample_rate)?)
    }

    /// Full request processing; failures become in-band error bodies
    pub fn process(&self, audio_base64: &str, language: &str) -> DetectionResponse {
        match self.analyze(audio_base64) {
            Ok((features, result)) => {
                tracing::info!(
                    language,
                    classification = ?result.classification(),
                    pitch_variation = features.pitch_variation,
                    energy_variation = features.energy_variation,
                    "Detection complete"
                );
                DetectionResponse::success(language, result)
            }
            Err(err) => {
                tracing::warn!(language, error = %err, "Detection failed");
                err.into()
            }
        }
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new(PitchConfig::default(), ClassifierParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classification;
    use serde_json::json;

    #[test]
    fn test_invalid_base64_is_in_band_error() {
        let response = DetectionPipeline::default().process("%%%not-base64%%%", "Tamil");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "message": "Invalid Base64 audio data"})
        );
    }

    #[test]
    fn test_undecodable_audio_is_processing_error() {
        // "hello world, not audio" in base64
        let response =
            DetectionPipeline::default().process("aGVsbG8gd29ybGQsIG5vdCBhdWRpbw==", "English");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["message"]
            .as_str()
            .unwrap()
            .starts_with("Audio processing error:"));
    }

    #[test]
    fn test_empty_payload_is_processing_error() {
        let err = DetectionPipeline::default().analyze("").unwrap_err();
        assert!(matches!(err, PipelineError::Processing(_)));
    }

    #[test]
    fn test_classify_silent_waveform() {
        let (features, result) = DetectionPipeline::default()
            .classify_waveform(&vec![0.0; 16000], 16000)
            .unwrap();
        assert_eq!(features.pitch_variation, 0.0);
        assert_eq!(features.energy_variation, 0.0);
        assert_eq!(result.classification(), Classification::AiGenerated);
        assert_eq!(result.confidence_score(), 0.91);
    }

    #[test]
    fn test_classify_empty_waveform_fails() {
        let result = DetectionPipeline::default().classify_waveform(&[], 16000);
        assert!(matches!(result, Err(FeatureError::EmptyWaveform)));
    }

    #[test]
    fn test_upload_error_message() {
        let response: DetectionResponse =
            PipelineError::Upload("connection reset".to_string()).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "message": "File upload error: connection reset"})
        );
    }
}
