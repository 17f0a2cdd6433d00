//! services/diary/src/adapters/stub.rs
//!
//! Offline stand-ins for both generation backends, selected with
//! `USE_MODEL_STUBS=true`. The reflection stub always returns the same
//! four-panel jogging lesson; the manga stub draws an SVG placeholder page.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use manga_diary_core::domain::{
    MangaResponse, Overview, Panel, QuizItem, ReflectionResult, Script, Teaching, VocabEntry,
};
use manga_diary_core::ports::{
    MangaRequest, MangaService, PortResult, ReflectionRequest, ReflectionService,
};
use serde_json::json;

/// How much of the entry the stub lesson quotes back.
const QUOTED_ENTRY_CHARS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct StubReflectionAdapter;

#[async_trait]
impl ReflectionService for StubReflectionAdapter {
    async fn reflect(&self, request: &ReflectionRequest<'_>) -> PortResult<ReflectionResult> {
        let panels = jogging_panels();

        let panel_descriptions: Vec<serde_json::Value> = panels
            .iter()
            .zip(PANEL_VISUALS)
            .map(|(panel, visual)| {
                json!({ "panel": panel.panel, "visual": visual, "dialogue": panel.jp })
            })
            .collect();

        let manga_prompt = json!({
            "style": "black and white manga, soft screentones, clean line art",
            "characters": [
                { "name": "You", "description": "Learner, casual sportswear, optimistic" },
                { "name": "Friend", "description": "Supportive friend, athletic, cheerful" },
            ],
            "panel_descriptions": panel_descriptions,
            "dialogue": panels.iter().map(|p| p.jp.clone()).collect::<Vec<_>>(),
        });

        Ok(ReflectionResult {
            script: Script {
                panels: panels.clone(),
            },
            teaching: Teaching {
                overview: Overview {
                    summary_en:
                        "A short conversation about jogging regularly and encouraging consistency."
                            .to_string(),
                    level: request.level.to_string(),
                    based_on_entry: request
                        .entry
                        .trim()
                        .chars()
                        .take(QUOTED_ENTRY_CHARS)
                        .collect(),
                },
                lines: panels,
                vocab: jogging_vocab(),
                quiz: jogging_quiz(),
            },
            manga_prompt,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct StubMangaAdapter;

#[async_trait]
impl MangaService for StubMangaAdapter {
    async fn generate_manga(&self, request: &MangaRequest<'_>) -> PortResult<MangaResponse> {
        Ok(MangaResponse {
            image_url: None,
            image_data_url: Some(placeholder_page(request.panels)),
            panels: Some(request.panels.to_vec()),
            notes: Some(
                "Stub image generated locally. \
                 Point MANGA_URL at a real backend to replace this."
                    .to_string(),
            ),
        })
    }
}

/// An SVG page with one line of dialogue per panel, as a base64 data URL.
pub fn placeholder_page(panels: &[Panel]) -> String {
    let lines: String = panels
        .iter()
        .enumerate()
        .map(|(idx, panel)| {
            format!(
                "<text x='70' y='{}' font-size='18' fill='#111'>{}: {}</text>",
                200 + idx * 200,
                idx + 1,
                escape_xml(&panel.jp)
            )
        })
        .collect();

    let svg = format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"720\" height=\"1100\">",
            "<style>text {{ font-family: 'Noto Sans JP', 'Fira Sans', sans-serif; }}</style>",
            "<rect width=\"100%\" height=\"100%\" fill=\"#f4f2ec\" />",
            "<text x=\"50%\" y=\"60\" text-anchor=\"middle\" font-size=\"28\" fill=\"#111\">",
            "Manga preview (stub)</text>",
            "<rect x=\"40\" y=\"90\" width=\"640\" height=\"960\" fill=\"none\" ",
            "stroke=\"#111\" stroke-width=\"6\" />",
            "<line x1=\"40\" y1=\"370\" x2=\"680\" y2=\"370\" ",
            "stroke=\"#111\" stroke-width=\"4\" />",
            "<line x1=\"40\" y1=\"650\" x2=\"680\" y2=\"650\" ",
            "stroke=\"#111\" stroke-width=\"4\" />",
            "{}",
            "</svg>"
        ),
        lines
    );

    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

//=========================================================================================
// Canned Lesson
//=========================================================================================

const PANEL_VISUALS: [&str; 4] = [
    "Morning jog in a city park, trees and path, character breathing lightly.",
    "Friend joins, encouraging expression, both stretching together.",
    "Close-up, character smiling shyly and shaking head.",
    "Both jogging side by side with a bright atmosphere.",
];

fn line(panel: u32, speaker: &str, jp: &str, romaji: &str, en: &str, note: &str) -> Panel {
    Panel {
        panel,
        speaker: Some(speaker.to_string()),
        jp: jp.to_string(),
        romaji: romaji.to_string(),
        en: en.to_string(),
        note: Some(note.to_string()),
    }
}

fn jogging_panels() -> Vec<Panel> {
    vec![
        line(
            1,
            "You",
            "今日は公園でジョギングしました。",
            "Kyou wa kouen de jogingu shimashita.",
            "I went jogging in the park today.",
            "～しました (past tense).",
        ),
        line(
            2,
            "Friend",
            "すごい！毎日運動しているの？",
            "Sugoi! Mainichi undou shite iru no?",
            "Nice! Do you exercise every day?",
            "～しているの？ for gently asking about habits.",
        ),
        line(
            3,
            "You",
            "いいえ、まだ週に二回だけです。",
            "Iie, mada shuu ni nikai dake desu.",
            "No, only twice a week for now.",
            "だけ limits the amount (only).",
        ),
        line(
            4,
            "Friend",
            "でも続けたらきっと上手くなるよ。",
            "Demo tsuzuketara kitto umaku naru yo.",
            "Keep at it and you'll get better.",
            "～たら for if/when conditionals.",
        ),
    ]
}

fn jogging_vocab() -> Vec<VocabEntry> {
    [
        ("運動", "うんどう", "undou", "exercise / movement"),
        ("続ける", "つづける", "tsuzukeru", "to continue"),
        ("週に二回", "しゅう に にかい", "shuu ni nikai", "twice a week"),
    ]
    .into_iter()
    .map(|(word, reading, romaji, meaning)| VocabEntry {
        word: word.to_string(),
        reading: Some(reading.to_string()),
        romaji: Some(romaji.to_string()),
        meaning: meaning.to_string(),
    })
    .collect()
}

fn jogging_quiz() -> Vec<QuizItem> {
    vec![
        QuizItem {
            question: "「続けたら」はどんな意味ですか？".to_string(),
            options: vec![
                "If you continue".to_string(),
                "If you stop".to_string(),
                "When you start".to_string(),
                "Unless you try".to_string(),
            ],
            answer_index: 0,
            explanation: "たら can mean if/when; here it is encouragement \
                          for the future if you keep going."
                .to_string(),
        },
        QuizItem {
            question: "「だけ」のニュアンスは？".to_string(),
            options: vec![
                "Emphasizing a large amount".to_string(),
                "Limiting to only that amount".to_string(),
                "Expressing surprise".to_string(),
                "Asking a question".to_string(),
            ],
            answer_index: 1,
            explanation: "だけ limits the amount: only twice a week.".to_string(),
        },
    ]
}
