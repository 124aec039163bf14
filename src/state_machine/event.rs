//! Events that can occur in a session

use crate::document::Document;
use crate::service::{IngestReceipt, ServiceError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    DocumentSelected { document: Document },
    SubmitDocument,
    UserQuestion { text: String },

    // Ingestion events
    IngestSucceeded { receipt: IngestReceipt },
    IngestFailed { error: ServiceError },

    // Question-answering events
    AnswerReceived { answer: String },
    AnswerFailed { error: ServiceError },
}

impl Event {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::DocumentSelected { .. } => "document_selected",
            Event::SubmitDocument => "submit_document",
            Event::UserQuestion { .. } => "user_question",
            Event::IngestSucceeded { .. } => "ingest_succeeded",
            Event::IngestFailed { .. } => "ingest_failed",
            Event::AnswerReceived { .. } => "answer_received",
            Event::AnswerFailed { .. } => "answer_failed",
        }
    }
}
