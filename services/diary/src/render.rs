//! services/diary/src/render.rs
//!
//! Plain-text rendering of session state for the terminal.

use std::fmt;

use chrono::Local;
use manga_diary_core::{GenerationOutcome, HistoryItem, ImageRef, Status};

/// The progress line shown while a generation is running.
pub fn status_line(status: Status) -> Option<&'static str> {
    match status {
        Status::Idle => None,
        Status::GeneratingText => Some("Writing your lesson..."),
        Status::GeneratingImage => Some("Drawing your manga page..."),
    }
}

pub fn render_outcome(outcome: &GenerationOutcome) -> String {
    OutcomeView(outcome).to_string()
}

/// Terminal layout of a finished generation.
struct OutcomeView<'a>(&'a GenerationOutcome);

impl fmt::Display for OutcomeView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outcome(out, self.0)
    }
}

fn write_outcome(out: &mut fmt::Formatter<'_>, outcome: &GenerationOutcome) -> fmt::Result {
    let manga = &outcome.manga;
    writeln!(out, "== Manga page ==")?;
    match &manga.image {
        ImageRef::Url(url) => writeln!(out, "Image: {url}")?,
        ImageRef::Inline(data) => {
            writeln!(out, "Image: inline ({} bytes, use --json to export)", data.len())?
        }
    }
    for panel in &manga.panels {
        writeln!(out, "  #{} {}", panel.panel, panel.jp)?;
        writeln!(out, "     {}", panel.romaji)?;
        writeln!(out, "     {}", panel.en)?;
    }
    if let Some(notes) = &manga.notes {
        writeln!(out, "  ({notes})")?;
    }

    let teaching = &outcome.teaching;
    writeln!(out)?;
    writeln!(out, "== Lesson ==")?;
    if !teaching.overview.summary_en.is_empty() {
        writeln!(out, "{}", teaching.overview.summary_en)?;
    }
    for line in &teaching.lines {
        let speaker = line.speaker.as_deref().map(|s| format!("{s}: ")).unwrap_or_default();
        writeln!(out, "Panel {}  {}{}", line.panel, speaker, line.jp)?;
        writeln!(out, "         {}", line.romaji)?;
        writeln!(out, "         {}", line.en)?;
        if let Some(note) = line.note.as_deref().filter(|n| !n.is_empty()) {
            writeln!(out, "         * {note}")?;
        }
    }

    if !teaching.vocab.is_empty() {
        writeln!(out)?;
        writeln!(out, "== Key words ==")?;
        for item in &teaching.vocab {
            match item.pronunciation() {
                Some(sound) => writeln!(out, "  {} ({}) - {}", item.word, sound, item.meaning)?,
                None => writeln!(out, "  {} - {}", item.word, item.meaning)?,
            }
        }
    }

    if !teaching.quiz.is_empty() {
        writeln!(out)?;
        writeln!(out, "== Quiz ==")?;
        for (n, item) in teaching.quiz.iter().enumerate() {
            writeln!(out, "{}. {}", n + 1, item.question)?;
            for (idx, option) in item.options.iter().enumerate() {
                writeln!(out, "   {}) {}", option_label(idx), option)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "Answers:")?;
        for (n, item) in teaching.quiz.iter().enumerate() {
            writeln!(
                out,
                "{}. {}) {}",
                n + 1,
                option_label(item.answer_index),
                item.explanation
            )?;
        }
    }
    Ok(())
}

pub fn render_history(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "No saved mangas yet. The last 2 you generate are kept here.\n".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "{}  {}  {}\n",
                item.id,
                item.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                item.preview()
            )
        })
        .collect()
}

fn option_label(idx: usize) -> char {
    u8::try_from(idx)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'a' + i))
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use manga_diary_core::{MangaResult, Panel, QuizItem, Script, Teaching, VocabEntry};

    fn outcome() -> GenerationOutcome {
        let panel = Panel {
            panel: 1,
            speaker: Some("You".into()),
            jp: "水族館に行った".into(),
            romaji: "suizokukan ni itta".into(),
            en: "I went to the aquarium".into(),
            note: Some("～た (plain past)".into()),
        };
        GenerationOutcome {
            teaching: Teaching {
                lines: vec![panel.clone()],
                vocab: vec![VocabEntry {
                    word: "水族館".into(),
                    reading: Some("すいぞくかん".into()),
                    romaji: None,
                    meaning: "aquarium".into(),
                }],
                quiz: vec![QuizItem {
                    question: "Where did you go?".into(),
                    options: vec!["Zoo".into(), "Aquarium".into()],
                    answer_index: 1,
                    explanation: "水族館 is an aquarium.".into(),
                }],
                ..Default::default()
            },
            script: Script {
                panels: vec![panel.clone()],
            },
            manga: MangaResult {
                image: ImageRef::Url("https://images.example/page.png".into()),
                panels: vec![panel],
                notes: None,
            },
        }
    }

    #[test]
    fn outcome_lists_image_lines_vocab_and_answers() {
        let text = render_outcome(&outcome());
        assert!(text.contains("Image: https://images.example/page.png"));
        assert!(text.contains("Panel 1  You: 水族館に行った"));
        assert!(text.contains("* ～た (plain past)"));
        assert!(text.contains("水族館 (すいぞくかん) - aquarium"));
        assert!(text.contains("   b) Aquarium"));
        assert!(text.contains("1. b) 水族館 is an aquarium."));
    }

    #[test]
    fn inline_image_is_summarized_not_dumped() {
        let mut outcome = outcome();
        outcome.manga.image = ImageRef::Inline("data:image/png;base64,AAAA".into());
        outcome.manga.notes = Some("stub".into());

        let text = render_outcome(&outcome);

        assert!(text.contains("Image: inline (26 bytes, use --json to export)"));
        assert!(!text.contains("base64,AAAA"));
        assert!(text.contains("  (stub)"));
    }

    #[test]
    fn history_shows_id_and_preview() {
        let item = HistoryItem {
            id: 1_700_000_000_000,
            timestamp: Utc::now(),
            entry: "x".repeat(80),
            result: outcome(),
        };
        let text = render_history(&[item]);
        assert!(text.starts_with("1700000000000  "));
        assert!(text.trim_end().ends_with(&format!("{}...", "x".repeat(60))));
        assert!(render_history(&[]).contains("No saved mangas yet"));
    }

    #[test]
    fn only_busy_statuses_have_a_progress_line() {
        assert_eq!(status_line(Status::Idle), None);
        assert!(status_line(Status::GeneratingText).is_some());
        assert!(status_line(Status::GeneratingImage).is_some());
    }
}
