//! crates/manga_diary_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! pipeline, session and history independent of HTTP clients and storage.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Level, MangaResponse, Panel, ReflectionResult};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The backend answered with a non-success status.
    #[error("Backend rejected the request with status {status}")]
    Rejected {
        status: u16,
        /// The `error` or `message` field of the failure body, if any.
        message: Option<String>,
    },
    /// The backend could not be reached or did not answer in time.
    #[error("Backend unreachable: {0}")]
    Transport(String),
    /// The backend answered successfully but the body did not decode.
    #[error("Malformed backend response: {0}")]
    Malformed(String),
    /// Reading or writing the local key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PortError {
    /// The message to show a user, falling back to `generic` when the backend
    /// rejected the request without explaining why.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            PortError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            PortError::Rejected { message: None, .. } => generic.to_string(),
            PortError::Transport(detail) | PortError::Malformed(detail) => {
                format!("{generic}: {detail}")
            }
            PortError::Storage(detail) => detail.clone(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Body of the text-generation request.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionRequest<'a> {
    pub entry: &'a str,
    pub level: Level,
}

/// Body of the image-generation request.
#[derive(Debug, Clone, Serialize)]
pub struct MangaRequest<'a> {
    pub manga_prompt: &'a serde_json::Value,
    pub panels: &'a [Panel],
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ReflectionService: Send + Sync {
    /// Turns a diary entry into a script, a lesson and a manga prompt.
    async fn reflect(&self, request: &ReflectionRequest<'_>) -> PortResult<ReflectionResult>;
}

#[async_trait]
pub trait MangaService: Send + Sync {
    /// Draws a manga page for the given prompt and panels.
    async fn generate_manga(&self, request: &MangaRequest<'_>) -> PortResult<MangaResponse>;
}

/// A synchronous string store addressed by fixed keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;
}
