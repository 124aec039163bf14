//! Wire types for the document services

use serde::{Deserialize, Serialize};

/// Body of a question request
#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

/// Body of a successful question response. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Body of a successful upload.
///
/// Only used for logging; a success status is all the session needs, so
/// every field is optional and an unreadable body falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub chunks_processed: Option<u64>,
}

/// Error body carrying a human-readable `detail`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Body of the service root, used as a health probe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub message: Option<String>,
}
