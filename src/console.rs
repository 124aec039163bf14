//! Terminal presentation for a session
//!
//! Reads commands from stdin and prints session updates. Everything here is
//! presentation: the affordances shown are derived from the session view and
//! every action goes through the `SessionHandle`.

mod markdown;

use crate::document::{Document, DocumentFilter};
use crate::runtime::{SessionHandle, SessionUpdate, SessionView};
use crate::state_machine::Readiness;
use crate::transcript::{Author, Entry};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

const HELP: &str = "\
Commands:
  /open <path>   select a document to upload
  /upload        upload the selected document
  /help          show this help
  /quit          leave
Anything else is sent as a question once a document is loaded.";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Upload,
    Ask(String),
    Help,
    Quit,
    /// Blank line
    Nothing,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Nothing;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Ask(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(n, a)| (n, a.trim()));
        match name {
            "open" if !arg.is_empty() => Command::Open(PathBuf::from(arg)),
            "upload" => Command::Upload,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Format one transcript entry for the terminal
pub fn format_entry(entry: &Entry) -> String {
    let who = match entry.turn.author {
        Author::User => "you",
        Author::Assistant => "assistant",
    };
    let body = match entry.turn.author {
        Author::User => entry.turn.content.clone(),
        Author::Assistant => markdown::render(&entry.turn.content),
    };
    format!("[{}] {who}: {body}", entry.appended_at.format("%H:%M"))
}

/// The prompt line, derived from the current view
pub fn prompt(view: &SessionView) -> String {
    match view.readiness {
        Readiness::Ready if view.thinking => "(waiting for the answer)".to_string(),
        Readiness::Ready => "Ask something about the document:".to_string(),
        Readiness::Unready if view.upload_in_flight => "Processing...".to_string(),
        Readiness::Unready => match &view.pending_document {
            Some(name) => format!("Selected {name}. /upload to process it."),
            None => "Upload your document with /open <path>.".to_string(),
        },
    }
}

/// What the console prints for one session update, if anything
pub fn render_update(update: &SessionUpdate) -> Option<String> {
    match update {
        // The user's own line is already on screen
        SessionUpdate::TurnAppended { entry } if entry.turn.author == Author::User => None,
        SessionUpdate::TurnAppended { entry } => Some(format_entry(entry)),
        SessionUpdate::StateChange { view } if view.thinking => Some("Thinking...".to_string()),
        SessionUpdate::StateChange { view } if view.upload_in_flight => {
            Some("Processing...".to_string())
        }
        SessionUpdate::StateChange { view } => Some(prompt(view)),
        SessionUpdate::Alert { message } => Some(format!("!! {message} (press Enter)")),
        SessionUpdate::Rejected { reason } => Some(reason.to_string()),
        SessionUpdate::InputCleared => None,
    }
}

/// Blocks input after an alert until one line acknowledges it
#[derive(Debug, Default)]
pub struct AlertGate {
    pending: AtomicBool,
}

impl AlertGate {
    pub fn raise(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Returns the command for `line`, or `None` when the line only
    /// acknowledges a pending alert
    pub fn filter(&self, line: &str) -> Option<Command> {
        if self.pending.swap(false, Ordering::SeqCst) {
            None
        } else {
            Some(Command::parse(line))
        }
    }
}

/// Run the interactive console until stdin closes or the user quits
pub async fn run(handle: SessionHandle) -> std::io::Result<()> {
    let filter = DocumentFilter::pdf();
    let gate = Arc::new(AlertGate::default());

    for entry in &handle.view().transcript {
        println!("{}", format_entry(entry));
    }
    println!("Supported format: {}", filter.label());
    println!("{}", prompt(&handle.view()));

    let printer = tokio::spawn(print_updates(handle.subscribe(), gate.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = gate.filter(&line) else {
            println!("{}", prompt(&handle.view()));
            continue;
        };

        match command {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Unknown(cmd) => println!("Unknown command {cmd}. Try /help."),
            Command::Open(path) => {
                if !filter.accepts(&path) {
                    println!("Only {} files can be selected.", filter.label());
                    continue;
                }
                match Document::load(&path).await {
                    Ok(document) => send(handle.select_document(document).await),
                    Err(e) => println!("{e}"),
                }
            }
            Command::Upload => send(handle.submit().await),
            Command::Ask(text) => send(handle.ask(text).await),
        }
    }

    printer.abort();
    Ok(())
}

fn send(result: Result<(), String>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Session is no longer running");
    }
}

async fn print_updates(mut updates: broadcast::Receiver<SessionUpdate>, gate: Arc<AlertGate>) {
    loop {
        match updates.recv().await {
            Ok(update) => {
                if matches!(update, SessionUpdate::Alert { .. }) {
                    gate.raise();
                }
                if let Some(text) = render_update(&update) {
                    println!("{text}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Console fell behind session updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
