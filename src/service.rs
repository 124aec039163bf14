//! Clients for the external document services
//!
//! The ingestion service accepts a document; the question-answering service
//! answers questions about it. Both sit behind one base URL.

mod error;
mod http;
mod types;

pub use error::{ServiceError, ServiceErrorKind};
pub use http::HttpDocumentService;
pub use types::{HealthStatus, IngestReceipt};

use crate::document::Document;
use crate::runtime::{AnswerService, IngestionService};
use async_trait::async_trait;

/// Logging wrapper for the document services
pub struct LoggingService<S> {
    inner: S,
}

impl<S> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: IngestionService> IngestionService for LoggingService<S> {
    async fn ingest(&self, document: &Document) -> Result<IngestReceipt, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.ingest(document).await;
        let duration = start.elapsed();

        match &result {
            Ok(receipt) => {
                tracing::info!(
                    file = %document.file_name(),
                    bytes = document.len(),
                    duration_ms = %duration.as_millis(),
                    chunks = ?receipt.chunks_processed,
                    "Document ingested"
                );
            }
            Err(e) => {
                tracing::error!(
                    file = %document.file_name(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    detail = ?e.detail,
                    error = %e.message,
                    "Document ingestion failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<S: AnswerService> AnswerService for LoggingService<S> {
    async fn answer(&self, question: &str) -> Result<String, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.answer(question).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    question_len = question.len(),
                    answer_len = answer.len(),
                    "Question answered"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    detail = ?e.detail,
                    error = %e.message,
                    "Question failed"
                );
            }
        }

        result
    }
}
