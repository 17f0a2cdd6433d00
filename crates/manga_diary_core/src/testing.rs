//! Shared fixtures and fake ports for the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::{
    GenerationOutcome, HistoryItem, ImageRef, MangaResponse, MangaResult, Overview, Panel,
    ReflectionResult, Script, Teaching, VocabEntry,
};
use crate::ports::{
    KeyValueStore, MangaRequest, MangaService, PortError, PortResult, ReflectionRequest,
    ReflectionService,
};

pub const PAGE_URL: &str = "https://images.example/page.png";

pub fn aquarium_panel() -> Panel {
    Panel {
        panel: 1,
        speaker: Some("You".into()),
        jp: "水族館に行った".into(),
        romaji: "suizokukan ni itta".into(),
        en: "I went to the aquarium".into(),
        note: None,
    }
}

pub fn aquarium_reflection() -> ReflectionResult {
    ReflectionResult {
        script: Script {
            panels: vec![aquarium_panel()],
        },
        teaching: Teaching {
            overview: Overview {
                summary_en: "A trip to the aquarium.".into(),
                level: "beginner".into(),
                based_on_entry: "Today I visited an aquarium.".into(),
            },
            lines: vec![aquarium_panel()],
            vocab: vec![VocabEntry {
                word: "水族館".into(),
                reading: Some("すいぞくかん".into()),
                romaji: Some("suizokukan".into()),
                meaning: "aquarium".into(),
            }],
            quiz: Vec::new(),
        },
        manga_prompt: serde_json::json!("one panel, a diver waving at a whale shark"),
    }
}

pub fn aquarium_manga() -> MangaResponse {
    MangaResponse {
        image_url: Some(PAGE_URL.into()),
        image_data_url: None,
        panels: Some(vec![aquarium_panel()]),
        notes: None,
    }
}

pub fn history_item(id: i64, entry: &str) -> HistoryItem {
    let reflection = aquarium_reflection();
    let manga = MangaResult {
        image: ImageRef::Url(PAGE_URL.into()),
        panels: reflection.script.panels.clone(),
        notes: None,
    };
    HistoryItem {
        id,
        timestamp: Utc.timestamp_millis_opt(id).single().unwrap_or_else(Utc::now),
        entry: entry.to_string(),
        result: GenerationOutcome::assemble(reflection, manga),
    }
}

/// A store whose reads and writes always fail.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> PortResult<Option<String>> {
        Err(PortError::Storage("disk unavailable".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
        Err(PortError::Storage("disk unavailable".into()))
    }
}

/// A reflection backend returning a canned answer and recording its calls.
pub struct FakeReflection {
    answer: PortResult<ReflectionResult>,
    calls: AtomicUsize,
    last_entry: Mutex<Option<String>>,
}

impl FakeReflection {
    pub fn ok(result: ReflectionResult) -> Self {
        Self::with(Ok(result))
    }

    pub fn failing(error: PortError) -> Self {
        Self::with(Err(error))
    }

    fn with(answer: PortResult<ReflectionResult>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            last_entry: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_entry(&self) -> Option<String> {
        self.last_entry.lock().ok().and_then(|entry| entry.clone())
    }
}

#[async_trait]
impl ReflectionService for FakeReflection {
    async fn reflect(&self, request: &ReflectionRequest<'_>) -> PortResult<ReflectionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_entry.lock() {
            *last = Some(request.entry.to_string());
        }
        self.answer.clone()
    }
}

/// A manga backend returning a canned answer and recording its calls.
pub struct FakeManga {
    answer: PortResult<MangaResponse>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<serde_json::Value>>,
}

impl FakeManga {
    pub fn ok(response: MangaResponse) -> Self {
        Self::with(Ok(response))
    }

    pub fn failing(error: PortError) -> Self {
        Self::with(Err(error))
    }

    fn with(answer: PortResult<MangaResponse>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<serde_json::Value> {
        self.last_prompt.lock().ok().and_then(|prompt| prompt.clone())
    }
}

#[async_trait]
impl MangaService for FakeManga {
    async fn generate_manga(&self, request: &MangaRequest<'_>) -> PortResult<MangaResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(request.manga_prompt.clone());
        }
        self.answer.clone()
    }
}
