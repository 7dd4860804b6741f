//! voxprobe-vd library - Voice Detection module
//!
//! Classifies a speech clip as HUMAN or AI_GENERATED from the dispersion of
//! its pitch contour and amplitude envelope.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod analysis;
pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::GatewayOptions;
pub use error::{ApiError, ApiResult};

use services::{DetectionPipeline, Readiness};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Stateless detection pipeline
    pub pipeline: Arc<DetectionPipeline>,
    /// Expected `x-api-key` value
    pub api_key: Arc<str>,
    /// One-shot warm-up result
    pub readiness: Readiness,
    /// Router switches
    pub options: GatewayOptions,
    /// Service start time (for uptime)
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(pipeline: Arc<DetectionPipeline>, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            pipeline,
            api_key: api_key.into(),
            readiness: Readiness::new(),
            options: GatewayOptions::default(),
            startup_time: Utc::now(),
        }
    }

    pub fn with_options(mut self, options: GatewayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }
}

/// Build application router
///
/// `GET /`, `/ready` and `/health` are public. The detection routes require
/// `x-api-key`; the check is a route layer, so unknown paths still 404.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/voice-detection", post(api::detect_voice))
        .route("/api/voice-detection/upload", post(api::detect_voice_upload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_api_key,
        ));

    let root = if state.options.legacy_root_route {
        get(api::liveness).merge(post(api::detect_voice_relaxed).route_layer(
            middleware::from_fn_with_state(state.clone(), api::require_api_key),
        ))
    } else {
        get(api::liveness)
    };

    let public = Router::new()
        .route("/", root)
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(state.options.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
