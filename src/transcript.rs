//! Ordered, append-only record of the conversation

use chrono::{DateTime, Local};

/// Greeting the transcript starts with
pub const GREETING: &str = "Hello! Upload a PDF document to get started.";

/// Appended once the ingestion service accepts the document
pub const UPLOAD_CONFIRMATION: &str = "PDF processed! You can now ask questions about it.";

/// Stands in for the answer whenever a question exchange fails
pub const APOLOGY: &str = "Sorry, something went wrong.";

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One authored unit of the conversation.
///
/// `content` is markdown. It is rendered for display and never interpreted
/// as anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub author: Author,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            content: content.into(),
        }
    }
}

/// A turn as committed to the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Zero-based position in the transcript
    pub index: usize,
    pub turn: Turn,
    pub appended_at: DateTime<Local>,
}

/// Append-only turn sequence.
///
/// `append` is the only mutation; entries are never edited or removed.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// A fresh transcript holding only the greeting
    pub fn new() -> Self {
        let mut transcript = Self {
            entries: Vec::new(),
        };
        transcript.append(Turn::assistant(GREETING));
        transcript
    }

    /// Commit a turn and return the stored entry
    pub fn append(&mut self, turn: Turn) -> &Entry {
        let index = self.entries.len();
        self.entries.push(Entry {
            index,
            turn,
            appended_at: Local::now(),
        });
        &self.entries[index]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[allow(dead_code)] // Used by tests
    pub fn turns(&self) -> impl Iterator<Item = &Turn> + '_ {
        self.entries.iter().map(|e| &e.turn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)] // Used by tests
    pub fn last(&self) -> Option<&Turn> {
        self.entries.last().map(|e| &e.turn)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
