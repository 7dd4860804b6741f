//! # VoxProbe Common Library
//!
//! Shared code for VoxProbe services including:
//! - Error type used outside the HTTP layer
//! - Bootstrap configuration (CLI → ENV → TOML → compiled defaults)
//! - Tracing subscriber initialisation
//! - API key verification and shared response bodies

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
