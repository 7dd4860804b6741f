//! Classification outcome and the response bodies built from it

use serde::Serialize;
use voxprobe_common::api::types::{StatusBody, STATUS_SUCCESS};

/// Verdict produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Human,
    AiGenerated,
}

impl Classification {
    /// Fixed explanation shown for each verdict
    pub fn explanation(&self) -> &'static str {
        match self {
            Classification::Human => "Natural pitch variation and human-like prosody detected",
            Classification::AiGenerated => {
                "Unnatural pitch consistency and robotic speech patterns detected"
            }
        }
    }
}

/// Classifier output
///
/// Only constructed through [`ClassificationResult::human`] and
/// [`ClassificationResult::ai_generated`], so the verdict, its confidence and
/// its explanation always belong to the same branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    classification: Classification,
    confidence_score: f64,
}

impl ClassificationResult {
    pub(crate) fn human(confidence_score: f64) -> Self {
        Self {
            classification: Classification::Human,
            confidence_score,
        }
    }

    pub(crate) fn ai_generated(confidence_score: f64) -> Self {
        Self {
            classification: Classification::AiGenerated,
            confidence_score,
        }
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn explanation(&self) -> &'static str {
        self.classification.explanation()
    }
}

/// Success body for the detection endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSuccess {
    pub status: &'static str,
    pub language: String,
    pub classification: Classification,
    pub confidence_score: f64,
    pub explanation: &'static str,
}

/// Body returned with HTTP 200 by the detection endpoints
///
/// Pipeline failures (bad base64, undecodable audio) are reported in-band
/// as `{status: "error", message}` rather than as an HTTP error status;
/// existing callers depend on that.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetectionResponse {
    Success(DetectionSuccess),
    Error(StatusBody),
}

impl DetectionResponse {
    pub fn success(language: impl Into<String>, result: ClassificationResult) -> Self {
        DetectionResponse::Success(DetectionSuccess {
            status: STATUS_SUCCESS,
            language: language.into(),
            classification: result.classification(),
            confidence_score: result.confidence_score(),
            explanation: result.explanation(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        DetectionResponse::Error(StatusBody::error(message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DetectionResponse::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_shape() {
        let body = DetectionResponse::success("Tamil", ClassificationResult::ai_generated(0.91));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "success",
                "language": "Tamil",
                "classification": "AI_GENERATED",
                "confidenceScore": 0.91,
                "explanation": "Unnatural pitch consistency and robotic speech patterns detected",
            })
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = DetectionResponse::error("Invalid Base64 audio data");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "Invalid Base64 audio data"})
        );
        assert!(!body.is_success());
    }

    #[test]
    fn test_human_triple_matches() {
        let result = ClassificationResult::human(0.85);
        assert_eq!(result.classification(), Classification::Human);
        assert_eq!(
            result.explanation(),
            "Natural pitch variation and human-like prosody detected"
        );
    }
}
