//! HTTP API handlers for voxprobe-vd
//!
//! Protected routes go through [`auth::require_api_key`] before any body is
//! read, so a bad key is reported ahead of any validation problem.

pub mod auth;
pub mod detection;
pub mod health;
pub mod upload;

pub use auth::require_api_key;
pub use detection::{detect_voice, detect_voice_relaxed};
pub use health::{health_routes, liveness};
pub use upload::detect_voice_upload;
