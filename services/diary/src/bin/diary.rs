//! services/diary/src/bin/diary.rs
//!
//! Command-line front end: turns a diary entry into a manga page and a
//! Japanese lesson, and manages the saved history.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use diary_lib::{
    app::{build_pipeline, open_session},
    config::Config,
    error::DiaryError,
    render,
};
use manga_diary_core::{prompts, GenerationOutcome, Level, Session};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn your day into a manga and learn the Japanese on it.
#[derive(Parser, Debug)]
#[command(name = "diary")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a lesson and manga page from a diary entry
    Generate {
        /// Proficiency level: beginner, intermediate or advanced
        #[arg(short, long, default_value_t = Level::Beginner)]
        level: Level,

        /// Use a random example entry instead of ENTRY
        #[arg(long, conflicts_with = "entry")]
        example: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,

        /// The entry text; read from stdin when omitted
        entry: Vec<String>,
    },
    /// Print a random example entry
    Example,
    /// List saved generations, most recent first
    History,
    /// Show a saved generation
    Show {
        id: i64,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved generation
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), DiaryError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    // --- 2. Dispatch the Intent ---
    match cli.command {
        Command::Generate {
            level,
            example,
            json,
            entry,
        } => {
            let pipeline = build_pipeline(&config)?;
            let mut session = open_session(&config);
            session.set_level(level);
            if example {
                let picked = session.pick_example()?;
                eprintln!("Entry: {picked}");
            } else {
                session.set_entry(read_entry(entry)?);
            }

            let mut progress = session.subscribe();
            let printer = tokio::spawn(async move {
                // Ends once the session is dropped and the backlog is drained.
                while let Ok(status) = progress.recv().await {
                    if let Some(line) = render::status_line(status) {
                        eprintln!("{line}");
                    }
                }
            });

            let submitted = session.submit(&pipeline).await;
            let outcome = session.result().cloned();
            drop(session);
            if let Err(e) = printer.await {
                warn!("Progress printer stopped early: {e}");
            }
            submitted?;

            if let Some(outcome) = outcome {
                print_outcome(&outcome, json)?;
            }
            Ok(())
        }
        Command::Example => {
            println!("{}", prompts::pick());
            Ok(())
        }
        Command::History => {
            let session = open_session(&config);
            print!("{}", render::render_history(session.history()));
            Ok(())
        }
        Command::Show { id, json } => {
            let mut session = open_session(&config);
            session.select_history(id)?;
            if !json {
                println!("Entry: {}\n", session.entry());
            }
            print_result(&session, json)
        }
        Command::Delete { id } => {
            let mut session = open_session(&config);
            if session.delete_history(id) {
                println!("Deleted {id}");
            } else {
                println!("Nothing saved under {id}");
            }
            Ok(())
        }
    }
}

fn print_result(session: &Session, json: bool) -> Result<(), DiaryError> {
    match session.result() {
        Some(outcome) => print_outcome(outcome, json),
        None => Ok(()),
    }
}

fn print_outcome(outcome: &GenerationOutcome, json: bool) -> Result<(), DiaryError> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print!("{}", render::render_outcome(outcome));
    }
    Ok(())
}

/// Joins the positional words, or reads stdin when there are none.
fn read_entry(words: Vec<String>) -> Result<String, DiaryError> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
