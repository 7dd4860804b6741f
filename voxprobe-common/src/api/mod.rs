//! Shared API helpers
//!
//! Pure functions and plain types only; HTTP framework glue lives in each service.

pub mod auth;
pub mod types;

pub use auth::{verify_api_key, ApiKeyError, API_KEY_HEADER};
pub use types::StatusBody;
