//! services/diary/src/adapters/reflect_http.rs
//!
//! This module contains the adapter for the text-generation backend.
//! It implements the `ReflectionService` port from the `core` crate.

use async_trait::async_trait;
use manga_diary_core::domain::ReflectionResult;
use manga_diary_core::ports::{PortResult, ReflectionRequest, ReflectionService};

use super::http::post_json;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReflectionService` by POSTing to an HTTP endpoint.
#[derive(Clone)]
pub struct HttpReflectionAdapter {
    client: reqwest::Client,
    url: String,
}

impl HttpReflectionAdapter {
    /// Creates a new `HttpReflectionAdapter`.
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

//=========================================================================================
// `ReflectionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReflectionService for HttpReflectionAdapter {
    /// Sends `{entry, level}` and decodes `{script, teaching, manga_prompt}`.
    async fn reflect(&self, request: &ReflectionRequest<'_>) -> PortResult<ReflectionResult> {
        post_json(&self.client, &self.url, request).await
    }
}
