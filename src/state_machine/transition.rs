//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. Rejected events leave the state untouched.

use super::{Effect, Event, SessionState};
use crate::service::{ServiceError, ServiceErrorKind};
use crate::transcript::{APOLOGY, UPLOAD_CONFIRMATION};
use thiserror::Error;

/// Alert shown when the ingestion service cannot be reached
pub const ALERT_CONNECTION_FAILED: &str = "Error connecting to backend";

/// Alert shown when the ingestion service refuses the document
pub const ALERT_UPLOAD_FAILED: &str = "Upload failed!";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No document selected")]
    NoDocumentSelected,
    #[error("An upload is already in progress")]
    UploadInFlight,
    #[error("A document is already loaded for this session")]
    DocumentAlreadyLoaded,
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("Still waiting for the previous answer")]
    AwaitingAnswer,
    #[error("Upload a document before asking questions")]
    NotReady,
    #[error("Unexpected {event} while {state}")]
    UnexpectedEvent {
        event: &'static str,
        state: &'static str,
    },
}

/// Pure transition function
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Document selection
        // ============================================================
        (SessionState::Unready | SessionState::Selected { .. }, Event::DocumentSelected { document }) => {
            Ok(TransitionResult::new(SessionState::Selected { document })
                .with_effect(Effect::NotifyStateChange))
        }

        // Picking a file while an upload runs only arms the next attempt
        (SessionState::Uploading { .. }, Event::DocumentSelected { document }) => {
            Ok(TransitionResult::new(SessionState::Uploading {
                next_document: Some(document),
            })
            .with_effect(Effect::NotifyStateChange))
        }

        (SessionState::Ready | SessionState::AwaitingAnswer { .. }, Event::DocumentSelected { .. })
        | (SessionState::Ready | SessionState::AwaitingAnswer { .. }, Event::SubmitDocument) => {
            Err(TransitionError::DocumentAlreadyLoaded)
        }

        // ============================================================
        // Submission
        // ============================================================
        (SessionState::Selected { document }, Event::SubmitDocument) => {
            Ok(TransitionResult::new(SessionState::Uploading {
                next_document: None,
            })
            .with_effect(Effect::NotifyStateChange)
            .with_effect(Effect::RequestIngestion {
                document: document.clone(),
            }))
        }

        (SessionState::Unready, Event::SubmitDocument) => Err(TransitionError::NoDocumentSelected),

        (SessionState::Uploading { .. }, Event::SubmitDocument) => {
            Err(TransitionError::UploadInFlight)
        }

        // ============================================================
        // Ingestion results
        // ============================================================
        (SessionState::Uploading { .. }, Event::IngestSucceeded { .. }) => {
            Ok(TransitionResult::new(SessionState::Ready)
                .with_effect(Effect::assistant_turn(UPLOAD_CONFIRMATION))
                .with_effect(Effect::NotifyStateChange))
        }

        (SessionState::Uploading { next_document }, Event::IngestFailed { error }) => {
            let new_state = match next_document {
                Some(document) => SessionState::Selected {
                    document: document.clone(),
                },
                None => SessionState::Unready,
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::alert(ingestion_alert(&error)))
                .with_effect(Effect::NotifyStateChange))
        }

        // ============================================================
        // Questions
        // ============================================================
        (_, Event::UserQuestion { text }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyQuestion)
        }

        (SessionState::Ready, Event::UserQuestion { text }) => {
            Ok(TransitionResult::new(SessionState::AwaitingAnswer {
                question: text.clone(),
            })
            .with_effect(Effect::user_turn(text.clone()))
            .with_effect(Effect::ClearInput)
            .with_effect(Effect::NotifyStateChange)
            .with_effect(Effect::RequestAnswer { question: text }))
        }

        (SessionState::AwaitingAnswer { .. }, Event::UserQuestion { .. }) => {
            Err(TransitionError::AwaitingAnswer)
        }

        (
            SessionState::Unready | SessionState::Selected { .. } | SessionState::Uploading { .. },
            Event::UserQuestion { .. },
        ) => Err(TransitionError::NotReady),

        // ============================================================
        // Answers
        // ============================================================
        (SessionState::AwaitingAnswer { .. }, Event::AnswerReceived { answer }) => {
            Ok(TransitionResult::new(SessionState::Ready)
                .with_effect(Effect::assistant_turn(answer))
                .with_effect(Effect::NotifyStateChange))
        }

        (SessionState::AwaitingAnswer { .. }, Event::AnswerFailed { .. }) => {
            Ok(TransitionResult::new(SessionState::Ready)
                .with_effect(Effect::assistant_turn(APOLOGY))
                .with_effect(Effect::NotifyStateChange))
        }

        // ============================================================
        // Results arriving in a state that did not ask for them
        // ============================================================
        (
            state,
            event @ (Event::IngestSucceeded { .. }
            | Event::IngestFailed { .. }
            | Event::AnswerReceived { .. }
            | Event::AnswerFailed { .. }),
        ) => Err(TransitionError::UnexpectedEvent {
            event: event.name(),
            state: state.name(),
        }),
    }
}

/// Message for the blocking acknowledgment after a failed upload
pub fn ingestion_alert(error: &ServiceError) -> &'static str {
    match error.kind {
        ServiceErrorKind::Network => ALERT_CONNECTION_FAILED,
        _ => ALERT_UPLOAD_FAILED,
    }
}
