//! Session state types

use crate::document::Document;

/// Whether a usable document is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Unready,
    Ready,
}

/// Session state.
///
/// The two latches (`upload_in_flight`, `awaiting_answer`) are encoded in the
/// variant rather than stored as flags, so an answer can only be awaited once
/// the session is ready and neither latch can be set while the other phase
/// is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No document loaded, no upload running
    #[default]
    Unready,

    /// A document is selected but not yet submitted
    Selected { document: Document },

    /// Ingestion request in flight. A document picked meanwhile is held
    /// for the next attempt; it is never submitted implicitly.
    Uploading { next_document: Option<Document> },

    /// Document ingested, ready for a question
    Ready,

    /// Question in flight
    AwaitingAnswer { question: String },
}

impl SessionState {
    pub fn readiness(&self) -> Readiness {
        match self {
            SessionState::Unready
            | SessionState::Selected { .. }
            | SessionState::Uploading { .. } => Readiness::Unready,
            SessionState::Ready | SessionState::AwaitingAnswer { .. } => Readiness::Ready,
        }
    }

    pub fn upload_in_flight(&self) -> bool {
        matches!(self, SessionState::Uploading { .. })
    }

    pub fn awaiting_answer(&self) -> bool {
        matches!(self, SessionState::AwaitingAnswer { .. })
    }

    /// The document that would be sent by a submit, if any
    pub fn pending_document(&self) -> Option<&Document> {
        match self {
            SessionState::Selected { document } => Some(document),
            SessionState::Uploading { next_document } => next_document.as_ref(),
            _ => None,
        }
    }

    /// Whether the submit affordance is enabled
    pub fn can_submit(&self) -> bool {
        matches!(self, SessionState::Selected { .. })
    }

    /// Whether the ask affordance is enabled (the text must still be non-blank)
    pub fn can_ask(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    /// Short name for logs and state notifications
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unready => "unready",
            SessionState::Selected { .. } => "selected",
            SessionState::Uploading { .. } => "uploading",
            SessionState::Ready => "ready",
            SessionState::AwaitingAnswer { .. } => "awaiting_answer",
        }
    }
}
