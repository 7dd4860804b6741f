//! Liveness, readiness and diagnostics endpoints (no authentication)

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// GET / response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub message: &'static str,
}

/// GET /ready response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("voxprobe-vd")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Warm-up finished successfully
    pub ready: bool,
    /// Warm-up failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_error: Option<String>,
}

/// GET /
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "AI Generated Voice Detection API is running",
    })
}

/// GET /ready
///
/// Observability only: detection requests are served whether or not this is true.
pub async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: state.readiness.is_ready(),
    })
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let warmup_error = match state.readiness.outcome() {
        Some(Err(e)) => Some(e.to_string()),
        _ => None,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: crate::config::MODULE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        ready: state.readiness.is_ready(),
        warmup_error,
    })
}

/// Build readiness/health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/ready", get(readiness))
        .route("/health", get(health_check))
}
