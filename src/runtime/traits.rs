//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::document::Document;
use crate::service::{IngestReceipt, ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

/// Accepts a document and prepares it for question answering
#[async_trait]
pub trait IngestionService: Send + Sync {
    /// Upload a document. Any error means the session stays unready.
    async fn ingest(&self, document: &Document) -> Result<IngestReceipt, ServiceError>;
}

/// Answers a question about the ingested document
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask a question and return the answer text
    async fn answer(&self, question: &str) -> Result<String, ServiceError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: IngestionService + ?Sized> IngestionService for Arc<T> {
    async fn ingest(&self, document: &Document) -> Result<IngestReceipt, ServiceError> {
        (**self).ingest(document).await
    }
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn answer(&self, question: &str) -> Result<String, ServiceError> {
        (**self).answer(question).await
    }
}
