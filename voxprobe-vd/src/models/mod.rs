//! Data models for voxprobe-vd

pub mod detection;
pub mod language;
pub mod request;

pub use detection::{Classification, ClassificationResult, DetectionResponse};
pub use language::{SupportedLanguage, UnsupportedLanguage};
pub use request::{
    validate_upload, DetectionRequest, RequestValidationError, ValidatedRequest, ValidationMode,
};
