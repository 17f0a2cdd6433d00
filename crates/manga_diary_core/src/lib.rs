pub mod domain;
pub mod history;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use domain::{
    Entry, GenerationOutcome, HistoryItem, ImageRef, Level, MangaResponse, MangaResult, Panel,
    QuizItem, ReflectionResult, Script, Teaching, VocabEntry,
};
pub use history::{HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use pipeline::{GenerationPipeline, PipelineError};
pub use ports::{
    KeyValueStore, MangaRequest, MangaService, PortError, PortResult, ReflectionRequest,
    ReflectionService,
};
pub use session::{Session, SessionError, Status};
pub use store::MemoryStore;
