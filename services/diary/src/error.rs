//! services/diary/src/error.rs
//!
//! Defines the primary error type for the diary service.

use crate::config::ConfigError;
use manga_diary_core::{PortError, SessionError};

/// The primary error type for the `diary` service.
#[derive(Debug, thiserror::Error)]
pub enum DiaryError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A rejected intent or a failed generation. Already user-facing.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// Represents an error building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a serialization failure while rendering output.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., reading stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
