//! crates/manga_diary_core/src/domain.rs
//!
//! Defines the core data structures for the application: the diary entry, the
//! lesson produced by the reflection stage, the manga page produced by the
//! image stage, and the persisted history items.
//!
//! The serde attributes mirror the JSON contract of the generation backends,
//! so the same structs are used on the wire and in the persisted history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of characters of the entry shown in a history preview.
pub const PREVIEW_CHARS: usize = 60;

//=========================================================================================
// Input Types
//=========================================================================================

/// A user's free-text description of their day. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Entry(String);

impl Entry {
    /// Returns `None` when the text is empty or whitespace-only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// The requested proficiency tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level '{0}', expected beginner, intermediate or advanced")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

//=========================================================================================
// Reflection (Stage 1) Output
//=========================================================================================

/// One numbered line of dialogue, shared between the lesson and the manga page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// 1-based index; matches the panel numbering of the generated page.
    pub panel: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub jp: String,
    #[serde(default)]
    pub romaji: String,
    #[serde(default)]
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub panels: Vec<Panel>,
}

impl Script {
    /// The panel indices in script order. This is the join key for stage 2.
    pub fn panel_indices(&self) -> Vec<u32> {
        self.panels.iter().map(|p| p.panel).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub summary_en: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub based_on_entry: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romaji: Option<String>,
    #[serde(default)]
    pub meaning: String,
}

impl VocabEntry {
    /// Romaji when the backend provided it, otherwise the kana reading.
    pub fn pronunciation(&self) -> Option<&str> {
        non_empty(self.romaji.as_deref()).or_else(|| non_empty(self.reading.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizItem {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teaching {
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub lines: Vec<Panel>,
    #[serde(default)]
    pub vocab: Vec<VocabEntry>,
    #[serde(default)]
    pub quiz: Vec<QuizItem>,
}

/// The full response of the reflection backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionResult {
    pub script: Script,
    pub teaching: Teaching,
    /// Forwarded verbatim to the manga backend; never inspected here.
    pub manga_prompt: serde_json::Value,
}

//=========================================================================================
// Manga (Stage 2) Output
//=========================================================================================

/// Where the generated page lives. Exactly one form is ever held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A remote image URL.
    Url(String),
    /// An inline `data:` URL carrying the encoded image.
    Inline(String),
}

impl ImageRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Url(url) => Some(url),
            ImageRef::Inline(_) => None,
        }
    }

    pub fn data_url(&self) -> Option<&str> {
        match self {
            ImageRef::Inline(data) => Some(data),
            ImageRef::Url(_) => None,
        }
    }
}

/// The raw response of the manga backend, before its shape is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<Vec<Panel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MangaShapeError {
    #[error("the manga backend returned no image")]
    MissingImage,
    #[error("manga panels {found:?} do not match script panels {expected:?}")]
    PanelMismatch { expected: Vec<u32>, found: Vec<u32> },
}

impl MangaResponse {
    /// Checks the response against the script that was sent and converts it
    /// into a `MangaResult`.
    ///
    /// `image_url` takes precedence over `image_data_url`. Missing panels fall
    /// back to the script's panels; panels with different indices are refused.
    pub fn into_result(self, script: &Script) -> Result<MangaResult, MangaShapeError> {
        let image = image_ref(self.image_url, self.image_data_url)
            .ok_or(MangaShapeError::MissingImage)?;

        let panels = match self.panels {
            Some(panels) => {
                let found: Vec<u32> = panels.iter().map(|p| p.panel).collect();
                let expected = script.panel_indices();
                if found != expected {
                    return Err(MangaShapeError::PanelMismatch { expected, found });
                }
                panels
            }
            None => script.panels.clone(),
        };

        Ok(MangaResult {
            image,
            panels,
            notes: self.notes,
        })
    }
}

/// A checked manga page. Serialized in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MangaResponse", into = "MangaResponse")]
pub struct MangaResult {
    pub image: ImageRef,
    pub panels: Vec<Panel>,
    pub notes: Option<String>,
}

impl TryFrom<MangaResponse> for MangaResult {
    type Error = MangaShapeError;

    fn try_from(wire: MangaResponse) -> Result<Self, Self::Error> {
        let image =
            image_ref(wire.image_url, wire.image_data_url).ok_or(MangaShapeError::MissingImage)?;
        Ok(Self {
            image,
            panels: wire.panels.unwrap_or_default(),
            notes: wire.notes,
        })
    }
}

impl From<MangaResult> for MangaResponse {
    fn from(result: MangaResult) -> Self {
        let (image_url, image_data_url) = match result.image {
            ImageRef::Url(url) => (Some(url), None),
            ImageRef::Inline(data) => (None, Some(data)),
        };
        Self {
            image_url,
            image_data_url,
            panels: Some(result.panels),
            notes: result.notes,
        }
    }
}

fn image_ref(url: Option<String>, data_url: Option<String>) -> Option<ImageRef> {
    let url = url.filter(|u| !u.trim().is_empty());
    let data_url = data_url.filter(|d| !d.trim().is_empty());
    url.map(ImageRef::Url).or(data_url.map(ImageRef::Inline))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Combined Outcome and History
//=========================================================================================

/// The display-ready result of a fully successful two-stage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub teaching: Teaching,
    pub script: Script,
    pub manga: MangaResult,
}

impl GenerationOutcome {
    pub fn assemble(reflection: ReflectionResult, manga: MangaResult) -> Self {
        Self {
            teaching: reflection.teaching,
            script: reflection.script,
            manga,
        }
    }
}

/// One persisted past generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub entry: String,
    pub result: GenerationOutcome,
}

impl HistoryItem {
    /// The first characters of the entry, with an ellipsis when it was cut.
    pub fn preview(&self) -> String {
        let mut chars = self.entry.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}
