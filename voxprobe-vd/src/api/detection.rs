//! JSON detection endpoints
//!
//! `POST /api/voice-detection` enforces the full schema; `POST /` is the
//! tester-compatible alias that only needs the fields to be present.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{DetectionRequest, DetectionResponse, ValidatedRequest, ValidationMode};
use crate::AppState;

/// POST /api/voice-detection
pub async fn detect_voice(
    State(state): State<AppState>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> ApiResult<Json<DetectionResponse>> {
    handle_json(state, payload, ValidationMode::Strict).await
}

/// POST / (relaxed schema)
pub async fn detect_voice_relaxed(
    State(state): State<AppState>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> ApiResult<Json<DetectionResponse>> {
    handle_json(state, payload, ValidationMode::Relaxed).await
}

async fn handle_json(
    state: AppState,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
    mode: ValidationMode,
) -> ApiResult<Json<DetectionResponse>> {
    let Json(request) = payload?;
    let request = request.validate(mode)?;
    Ok(Json(run_pipeline(&state, request).await?))
}

/// Run the CPU-bound pipeline on the blocking pool
///
/// Pipeline failures come back in-band inside the response; only a panic
/// inside the pipeline surfaces as a request-level error.
pub(crate) async fn run_pipeline(
    state: &AppState,
    request: ValidatedRequest,
) -> ApiResult<DetectionResponse> {
    let pipeline = state.pipeline.clone();
    let span = info_span!(
        "detection",
        request_id = %Uuid::new_v4(),
        language = %request.language,
        payload_len = request.audio_base64.len()
    );

    let blocking_span = span.clone();
    tokio::task::spawn_blocking(move || {
        let _guard = blocking_span.enter();
        pipeline.process(&request.audio_base64, &request.language)
    })
    .instrument(span)
    .await
    .map_err(|e| ApiError::Internal(format!("Detection task failed: {}", e)))
}
