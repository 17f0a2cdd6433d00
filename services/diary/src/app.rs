//! services/diary/src/app.rs
//!
//! Wires the configured adapters into the core pipeline and session.

use std::sync::Arc;

use manga_diary_core::ports::{MangaService, ReflectionService};
use manga_diary_core::{GenerationPipeline, HistoryStore, Session};
use tracing::info;

use crate::adapters::{
    build_client, FileStore, HttpMangaAdapter, HttpReflectionAdapter, StubMangaAdapter,
    StubReflectionAdapter,
};
use crate::config::Config;
use crate::error::DiaryError;

/// Builds the pipeline from either the HTTP backends or the offline stubs.
pub fn build_pipeline(config: &Config) -> Result<GenerationPipeline, DiaryError> {
    let (reflection, manga): (Arc<dyn ReflectionService>, Arc<dyn MangaService>) =
        if config.use_stubs {
            info!("Using offline stub backends");
            (Arc::new(StubReflectionAdapter), Arc::new(StubMangaAdapter))
        } else {
            let client = build_client(config.request_timeout)?;
            info!(
                reflect_url = %config.reflect_url,
                manga_url = %config.manga_url,
                "Using HTTP backends"
            );
            (
                Arc::new(HttpReflectionAdapter::new(
                    client.clone(),
                    config.reflect_url.clone(),
                )),
                Arc::new(HttpMangaAdapter::new(client, config.manga_url.clone())),
            )
        };
    Ok(GenerationPipeline::new(reflection, manga))
}

/// Opens a session backed by the history file in the data directory.
pub fn open_session(config: &Config) -> Session {
    let store = Arc::new(FileStore::new(&config.data_dir));
    Session::new(HistoryStore::load(store))
}
