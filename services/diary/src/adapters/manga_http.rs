//! services/diary/src/adapters/manga_http.rs
//!
//! This module contains the adapter for the image-generation backend.
//! It implements the `MangaService` port from the `core` crate.

use async_trait::async_trait;
use manga_diary_core::domain::MangaResponse;
use manga_diary_core::ports::{MangaRequest, MangaService, PortResult};

use super::http::post_json;

/// An adapter that implements `MangaService` by POSTing to an HTTP endpoint.
#[derive(Clone)]
pub struct HttpMangaAdapter {
    client: reqwest::Client,
    url: String,
}

impl HttpMangaAdapter {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl MangaService for HttpMangaAdapter {
    /// Sends `{manga_prompt, panels}`; the shape of the answer is checked by
    /// the pipeline, not here.
    async fn generate_manga(&self, request: &MangaRequest<'_>) -> PortResult<MangaResponse> {
        post_json(&self.client, &self.url, request).await
    }
}
