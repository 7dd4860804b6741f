//! Multipart upload endpoint
//!
//! `POST /api/voice-detection/upload` takes a `file` part and a `language`
//! field, re-encodes the file as base64 and hands it to the same pipeline as
//! the JSON endpoint.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use super::detection::run_pipeline;
use crate::error::{ApiError, ApiResult};
use crate::models::{validate_upload, DetectionResponse, ValidatedRequest};
use crate::services::PipelineError;
use crate::AppState;

/// File part as received
struct UploadedFile {
    filename: String,
    content: Result<Vec<u8>, String>,
}

/// POST /api/voice-detection/upload
pub async fn detect_voice_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DetectionResponse>> {
    let mut multipart = multipart?;

    let mut language: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "language" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                language = Some(text);
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                // Read failures are reported in-band once the form is validated
                let content = field
                    .bytes()
                    .await
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| e.body_text());
                file = Some(UploadedFile { filename, content });
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let language = language.ok_or_else(|| missing_field("language"))?;
    let file = file.ok_or_else(|| missing_field("file"))?;

    validate_upload(&language, &file.filename)?;

    let content = match file.content {
        Ok(content) => content,
        Err(reason) => return Ok(Json(PipelineError::Upload(reason).into())),
    };

    let request = ValidatedRequest {
        language,
        audio_base64: STANDARD.encode(&content),
    };
    Ok(Json(run_pipeline(&state, request).await?))
}

fn missing_field(name: &str) -> ApiError {
    ApiError::Validation(format!("Missing required field: {}", name))
}
