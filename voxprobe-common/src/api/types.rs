//! Response body shapes shared by every endpoint

use serde::{Deserialize, Serialize};

/// Value of `status` on failure bodies
pub const STATUS_ERROR: &str = "error";

/// Value of `status` on success bodies
pub const STATUS_SUCCESS: &str = "success";

/// `{status, message}` body used for every non-success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
    pub message: String,
}

impl StatusBody {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }
}
