//! Error types for voxprobe-vd
//!
//! Request-level failures only. Pipeline failures travel in-band inside a
//! 200 response (see `services::pipeline::PipelineError`).

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use voxprobe_common::api::StatusBody;

use crate::models::RequestValidationError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong API key (401); checked before anything else
    #[error("Invalid API key")]
    Unauthorized,

    /// Unsupported language/format or malformed request (422)
    #[error("{0}")]
    Validation(String),

    /// Body rejected before it could be parsed (413, 415)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an extractor rejection; only size and media-type failures keep their own status
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                ApiError::Rejected { status, message }
            }
            _ => ApiError::Validation(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(StatusBody::error(self.to_string()));
        (status, body).into_response()
    }
}

impl From<RequestValidationError> for ApiError {
    fn from(err: RequestValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_size_and_media_type_rejections_keep_status() {
        let too_large = ApiError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "big".into());
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.to_string(), "big");

        let media = ApiError::from_rejection(StatusCode::UNSUPPORTED_MEDIA_TYPE, "type".into());
        assert_eq!(media.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_other_rejections_are_validation() {
        let err = ApiError::from_rejection(StatusCode::BAD_REQUEST, "syntax".into());
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Invalid API key");
    }
}
