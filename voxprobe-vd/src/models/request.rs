//! Inbound request shapes and their validation
//!
//! Both detection entry points normalise to a [`ValidatedRequest`] before any
//! audio is touched.

use serde::Deserialize;
use thiserror::Error;

use super::language::{SupportedLanguage, UnsupportedLanguage};

/// The only container accepted by the strict JSON endpoint
pub const SUPPORTED_AUDIO_FORMAT: &str = "mp3";

/// The only file extension accepted by the upload endpoint
pub const SUPPORTED_FILE_EXTENSION: &str = ".mp3";

/// JSON body of `POST /api/voice-detection` and `POST /`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRequest {
    pub language: String,
    /// Defaults to "mp3" when omitted
    #[serde(default)]
    pub audio_format: Option<String>,
    pub audio_base64: String,
}

/// How much of the request schema to enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Language must be supported and audioFormat must be "mp3"
    Strict,
    /// Fields only need to be present; values are passed through
    Relaxed,
}

/// Request rejected before decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguage),

    #[error("Only MP3 format is supported")]
    UnsupportedFormat(String),

    #[error("Only MP3 files are supported")]
    UnsupportedFile(String),
}

/// Request normalised to what the pipeline needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Echoed verbatim in the response
    pub language: String,
    pub audio_base64: String,
}

impl DetectionRequest {
    pub fn validate(
        self,
        mode: ValidationMode,
    ) -> Result<ValidatedRequest, RequestValidationError> {
        if mode == ValidationMode::Strict {
            self.language.parse::<SupportedLanguage>()?;

            if let Some(format) = self.audio_format.as_deref() {
                if format != SUPPORTED_AUDIO_FORMAT {
                    return Err(RequestValidationError::UnsupportedFormat(format.to_string()));
                }
            }
        }

        Ok(ValidatedRequest {
            language: self.language,
            audio_base64: self.audio_base64,
        })
    }
}

/// Validate the form fields of a multipart upload
///
/// Language is checked before the filename.
pub fn validate_upload(
    language: &str,
    filename: &str,
) -> Result<SupportedLanguage, RequestValidationError> {
    let language = language.parse::<SupportedLanguage>()?;

    if !filename.to_lowercase().ends_with(SUPPORTED_FILE_EXTENSION) {
        return Err(RequestValidationError::UnsupportedFile(filename.to_string()));
    }

    Ok(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(language: &str, format: Option<&str>) -> DetectionRequest {
        DetectionRequest {
            language: language.to_string(),
            audio_format: format.map(str::to_string),
            audio_base64: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_strict_accepts_valid_request() {
        let validated = request("Hindi", Some("mp3"))
            .validate(ValidationMode::Strict)
            .unwrap();
        assert_eq!(validated.language, "Hindi");
        assert_eq!(validated.audio_base64, "AAAA");
    }

    #[test]
    fn test_strict_defaults_missing_format_to_mp3() {
        assert!(request("English", None)
            .validate(ValidationMode::Strict)
            .is_ok());
    }

    #[test]
    fn test_strict_rejects_unknown_language() {
        let err = request("French", Some("mp3"))
            .validate(ValidationMode::Strict)
            .unwrap_err();
        assert!(matches!(err, RequestValidationError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_strict_rejects_wav_format() {
        let err = request("Tamil", Some("wav"))
            .validate(ValidationMode::Strict)
            .unwrap_err();
        assert_eq!(err.to_string(), "Only MP3 format is supported");
    }

    #[test]
    fn test_strict_format_is_case_sensitive() {
        assert!(request("Tamil", Some("MP3"))
            .validate(ValidationMode::Strict)
            .is_err());
    }

    #[test]
    fn test_relaxed_passes_values_through() {
        let validated = request("Klingon", Some("ogg"))
            .validate(ValidationMode::Relaxed)
            .unwrap();
        assert_eq!(validated.language, "Klingon");
    }

    #[test]
    fn test_upload_extension_case_insensitive() {
        assert_eq!(
            validate_upload("Telugu", "VOICE.MP3"),
            Ok(SupportedLanguage::Telugu)
        );
    }

    #[test]
    fn test_upload_rejects_other_extensions() {
        let err = validate_upload("Telugu", "voice.wav").unwrap_err();
        assert_eq!(err.to_string(), "Only MP3 files are supported");
        assert!(validate_upload("Telugu", "mp3").is_err());
    }

    #[test]
    fn test_upload_checks_language_first() {
        let err = validate_upload("Klingon", "voice.wav").unwrap_err();
        assert!(matches!(err, RequestValidationError::UnsupportedLanguage(_)));
    }
}
