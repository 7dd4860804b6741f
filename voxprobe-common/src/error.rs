//! Startup-time error type shared by voxprobe services
//!
//! Request-level failures have their own types in each service.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file, environment or CLI value rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process-level setup failed (e.g. tracing already installed)
    #[error("Internal error: {0}")]
    Internal(String),
}
