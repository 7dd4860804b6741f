//! Threshold classifier over the dispersion statistics
//!
//! A clip is flagged AI_GENERATED only when BOTH its pitch variation and its
//! energy variation are under their thresholds; anything else is HUMAN.
//! Thresholds and confidences are uncalibrated placeholders, configurable
//! through the `[detection]` table.

use serde::Deserialize;
use voxprobe_common::{Error, Result};

use crate::models::ClassificationResult;

/// Classifier parameters (`[detection]` table)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Pitch standard deviation (Hz) under which pitch counts as flat
    pub pitch_variation_threshold: f64,
    /// Amplitude standard deviation under which loudness counts as flat
    pub energy_variation_threshold: f64,
    /// Confidence reported with AI_GENERATED
    pub ai_confidence: f64,
    /// Confidence reported with HUMAN
    pub human_confidence: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            pitch_variation_threshold: 10.0,
            energy_variation_threshold: 0.01,
            ai_confidence: 0.91,
            human_confidence: 0.85,
        }
    }
}

impl ClassifierParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pitch_variation_threshold", self.pitch_variation_threshold),
            ("energy_variation_threshold", self.energy_variation_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("ai_confidence", self.ai_confidence),
            ("human_confidence", self.human_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1] (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Classifier service
#[derive(Debug, Clone)]
pub struct Classifier {
    params: ClassifierParams,
}

impl Classifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    /// Decide HUMAN vs AI_GENERATED from the two statistics
    pub fn classify(&self, pitch_variation: f64, energy_variation: f64) -> ClassificationResult {
        let flat_pitch = pitch_variation < self.params.pitch_variation_threshold;
        let flat_energy = energy_variation < self.params.energy_variation_threshold;

        if flat_pitch && flat_energy {
            ClassificationResult::ai_generated(self.params.ai_confidence)
        } else {
            ClassificationResult::human(self.params.human_confidence)
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classification;

    #[test]
    fn test_flat_pitch_and_energy_is_ai() {
        let result = Classifier::default().classify(2.0, 0.001);
        assert_eq!(result.classification(), Classification::AiGenerated);
        assert_eq!(result.confidence_score(), 0.91);
        assert_eq!(
            result.explanation(),
            "Unnatural pitch consistency and robotic speech patterns detected"
        );
    }

    #[test]
    fn test_varied_pitch_is_human() {
        let result = Classifier::default().classify(35.0, 0.001);
        assert_eq!(result.classification(), Classification::Human);
        assert_eq!(result.confidence_score(), 0.85);
        assert_eq!(
            result.explanation(),
            "Natural pitch variation and human-like prosody detected"
        );
    }

    #[test]
    fn test_flat_pitch_alone_is_not_enough() {
        // Steady 220 Hz tone at 0.1 peak: pitch flat, amplitude std ~0.07
        let result = Classifier::default().classify(0.5, 0.0707);
        assert_eq!(result.classification(), Classification::Human);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(10.0, 0.001).classification(),
            Classification::Human
        );
        assert_eq!(
            classifier.classify(1.0, 0.01).classification(),
            Classification::Human
        );
    }

    #[test]
    fn test_silence_statistics_classify_as_ai() {
        let result = Classifier::default().classify(0.0, 0.0);
        assert_eq!(result.classification(), Classification::AiGenerated);
    }

    #[test]
    fn test_custom_params_are_used() {
        let classifier = Classifier::new(ClassifierParams {
            pitch_variation_threshold: 50.0,
            energy_variation_threshold: 0.5,
            ai_confidence: 0.6,
            human_confidence: 0.7,
        });
        let result = classifier.classify(20.0, 0.2);
        assert_eq!(result.classification(), Classification::AiGenerated);
        assert_eq!(result.confidence_score(), 0.6);
    }

    #[test]
    fn test_params_validation() {
        assert!(ClassifierParams::default().validate().is_ok());

        let bad_confidence = ClassifierParams {
            ai_confidence: 1.5,
            ..Default::default()
        };
        assert!(bad_confidence.validate().is_err());

        let bad_threshold = ClassifierParams {
            pitch_variation_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());
    }
}
