// src/error.rs
use thiserror::Error;

use crate::processing::stage::Stage;

/// Failures that end a processing run (or reject a configuration).
///
/// None of these are ever shown to the user verbatim; the orchestrator swaps
/// them for a fixed status string and only the log sees the details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The run was started without an image reference.
    #[error("missing image")]
    MissingInput,

    /// Any HTTP status, network, I/O or JSON parse failure from the upload.
    #[error("request to recognition service failed: {0}")]
    RequestFailed(String),

    /// A stage was configured with no status messages.
    #[error("message set for stage {0} is empty")]
    EmptyMessageSet(Stage),
}

impl ProcessingError {
    pub fn request_failed(cause: impl std::fmt::Display) -> Self {
        Self::RequestFailed(cause.to_string())
    }
}

impl From<reqwest::Error> for ProcessingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::RequestFailed(format!("transport timed out: {}", e))
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(e: std::io::Error) -> Self {
        Self::RequestFailed(format!("could not read image: {}", e))
    }
}

impl From<serde_json::Error> for ProcessingError {
    fn from(e: serde_json::Error) -> Self {
        Self::RequestFailed(format!("response was not valid JSON: {}", e))
    }
}
