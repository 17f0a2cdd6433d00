//! crates/manga_diary_core/src/session.rs
//!
//! The session state machine. It owns the user's current input, the status of
//! the in-flight generation, the last result or error, and the history store.
//!
//! Status transitions:
//!
//! ```text
//! idle --submit--> generating_text --stage 1 ok--> generating_image --stage 2 ok--> idle (result)
//!                        |                                |
//!                        +--------- failure --------------+------------------------> idle (error)
//! any --select history--> idle (entry + result restored)
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::domain::{Entry, GenerationOutcome, HistoryItem, Level};
use crate::history::HistoryStore;
use crate::pipeline::{GenerationPipeline, PipelineError};
use crate::prompts;

/// The progress of the current generation. Idle also covers "ready".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    GeneratingText,
    GeneratingImage,
}

impl Status {
    pub fn is_busy(&self) -> bool {
        !matches!(self, Status::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Tell us about your day before generating")]
    ValidationFailed,
    #[error("A generation is already in progress")]
    Busy,
    #[error("No history item with id {0}")]
    UnknownHistoryItem(i64),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Status changes buffered per subscriber. One submission makes three.
const STATUS_BUFFER: usize = 16;

pub struct Session {
    entry: String,
    level: Level,
    status: Status,
    error: Option<String>,
    result: Option<GenerationOutcome>,
    history: HistoryStore,
    status_tx: broadcast::Sender<Status>,
}

impl Session {
    pub fn new(history: HistoryStore) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_BUFFER);
        Self {
            entry: String::new(),
            level: Level::default(),
            status: Status::Idle,
            error: None,
            result: None,
            history,
            status_tx,
        }
    }

    //=====================================================================================
    // Read side, consumed by the presentation layer
    //=====================================================================================

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&GenerationOutcome> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.history.list()
    }

    /// A receiver that observes every status change, in order, including
    /// those made while `submit` is awaiting a backend. The channel closes
    /// when the session is dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<Status> {
        self.status_tx.subscribe()
    }

    //=====================================================================================
    // Intents
    //=====================================================================================

    pub fn set_entry(&mut self, text: impl Into<String>) {
        self.entry = text.into();
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Replaces the entry with a random example. Refused while generating.
    pub fn pick_example(&mut self) -> Result<&str, SessionError> {
        if self.status.is_busy() {
            return Err(SessionError::Busy);
        }
        self.entry = prompts::pick().to_string();
        Ok(&self.entry)
    }

    /// Runs the pipeline for the current entry and level.
    ///
    /// On success the outcome becomes the session result and is appended to
    /// history. On failure the message becomes the session error and the
    /// result stays empty. Either way the session ends idle.
    pub async fn submit(&mut self, pipeline: &GenerationPipeline) -> Result<(), SessionError> {
        let (entry, level) = self.begin_submit()?;

        let reflection = match pipeline.reflect(&entry, level).await {
            Ok(reflection) => reflection,
            Err(e) => return Err(self.fail(e)),
        };
        self.set_status(Status::GeneratingImage);

        let manga = match pipeline.illustrate(&reflection).await {
            Ok(manga) => manga,
            Err(e) => return Err(self.fail(e)),
        };

        let outcome = GenerationOutcome::assemble(reflection, manga);
        self.complete(entry, outcome, Utc::now());
        Ok(())
    }

    /// Restores a past generation without contacting any backend.
    pub fn select_history(&mut self, id: i64) -> Result<(), SessionError> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or(SessionError::UnknownHistoryItem(id))?;
        self.entry = item.entry;
        self.result = Some(item.result);
        self.error = None;
        self.set_status(Status::Idle);
        Ok(())
    }

    /// Deletes a past generation. Unknown ids are ignored.
    pub fn delete_history(&mut self, id: i64) -> bool {
        self.history.remove(id)
    }

    //=====================================================================================
    // Transitions
    //=====================================================================================

    fn begin_submit(&mut self) -> Result<(Entry, Level), SessionError> {
        if self.status.is_busy() {
            warn!("Submit ignored, status is {:?}", self.status);
            return Err(SessionError::Busy);
        }
        let entry = Entry::new(self.entry.clone()).ok_or(SessionError::ValidationFailed)?;

        self.error = None;
        self.result = None;
        self.set_status(Status::GeneratingText);
        Ok((entry, self.level))
    }

    fn fail(&mut self, error: PipelineError) -> SessionError {
        self.error = Some(error.to_string());
        self.set_status(Status::Idle);
        SessionError::Pipeline(error)
    }

    fn complete(&mut self, entry: Entry, outcome: GenerationOutcome, now: DateTime<Utc>) {
        let item = HistoryItem {
            id: self.history.next_id(now),
            timestamp: now,
            entry: entry.into_inner(),
            result: outcome.clone(),
        };
        info!(id = item.id, "Generation complete, saved to history");
        self.history.append(item);
        self.result = Some(outcome);
        self.set_status(Status::Idle);
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        // No subscribers is fine.
        let _ = self.status_tx.send(status);
    }
}
