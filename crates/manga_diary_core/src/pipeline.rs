//! crates/manga_diary_core/src/pipeline.rs
//!
//! The two-stage generation pipeline: the reflection backend writes the script
//! and lesson, then the manga backend draws the page from the script.
//!
//! The pipeline only sequences requests. It never touches session state or
//! history; the session drives it stage by stage.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{Entry, GenerationOutcome, Level, MangaResult, ReflectionResult};
use crate::ports::{MangaRequest, MangaService, ReflectionRequest, ReflectionService};

const REFLECTION_FALLBACK: &str = "Failed to write a lesson for this entry";
const MANGA_FALLBACK: &str = "Failed to draw the manga page";

/// A failed stage. The message is ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    ReflectionFailed(String),
    #[error("{0}")]
    MangaFailed(String),
}

#[derive(Clone)]
pub struct GenerationPipeline {
    reflection: Arc<dyn ReflectionService>,
    manga: Arc<dyn MangaService>,
}

impl GenerationPipeline {
    pub fn new(reflection: Arc<dyn ReflectionService>, manga: Arc<dyn MangaService>) -> Self {
        Self { reflection, manga }
    }

    /// Stage 1: asks the reflection backend for the script, lesson and prompt.
    pub async fn reflect(
        &self,
        entry: &Entry,
        level: Level,
    ) -> Result<ReflectionResult, PipelineError> {
        info!(%level, "Requesting reflection");
        let request = ReflectionRequest {
            entry: entry.as_str(),
            level,
        };

        match self.reflection.reflect(&request).await {
            Ok(reflection) => {
                info!(
                    panels = reflection.script.panels.len(),
                    "Reflection complete"
                );
                Ok(reflection)
            }
            Err(e) => {
                error!("Reflection failed: {}", e);
                Err(PipelineError::ReflectionFailed(
                    e.user_message(REFLECTION_FALLBACK),
                ))
            }
        }
    }

    /// Stage 2: asks the manga backend to draw the script produced by stage 1.
    pub async fn illustrate(
        &self,
        reflection: &ReflectionResult,
    ) -> Result<MangaResult, PipelineError> {
        info!("Requesting manga page");
        let request = MangaRequest {
            manga_prompt: &reflection.manga_prompt,
            panels: &reflection.script.panels,
        };

        let response = self.manga.generate_manga(&request).await.map_err(|e| {
            error!("Manga generation failed: {}", e);
            PipelineError::MangaFailed(e.user_message(MANGA_FALLBACK))
        })?;

        let manga = response.into_result(&reflection.script).map_err(|e| {
            error!("Manga response rejected: {}", e);
            PipelineError::MangaFailed(format!("{MANGA_FALLBACK}: {e}"))
        })?;

        info!("Manga page ready");
        Ok(manga)
    }

    /// Runs both stages in order and assembles the outcome.
    pub async fn run(
        &self,
        entry: &Entry,
        level: Level,
    ) -> Result<GenerationOutcome, PipelineError> {
        let reflection = self.reflect(entry, level).await?;
        let manga = self.illustrate(&reflection).await?;
        Ok(GenerationOutcome::assemble(reflection, manga))
    }
}
