//! API key middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use voxprobe_common::api::{verify_api_key, API_KEY_HEADER};

use crate::error::ApiError;
use crate::AppState;

/// Reject the request with 401 unless `x-api-key` matches the configured secret
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(reason) = verify_api_key(provided, &state.api_key) {
        warn!(path = %request.uri().path(), %reason, "Rejected request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
