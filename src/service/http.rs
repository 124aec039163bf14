//! HTTP client for the ingestion and question-answering services

use super::types::{AnswerResponse, ErrorBody, HealthStatus, IngestReceipt, QuestionRequest};
use super::ServiceError;
use crate::config::ClientConfig;
use crate::document::Document;
use crate::runtime::{AnswerService, IngestionService};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

const UPLOAD_PATH: &str = "/upload-pdf";
const CHAT_PATH: &str = "/chat";

/// Multipart field the ingestion service reads the file from
const FILE_FIELD: &str = "file";

/// Talks to both services behind one base URL
#[derive(Debug, Clone)]
pub struct HttpDocumentService {
    client: Client,
    config: ClientConfig,
}

impl HttpDocumentService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_url
    }

    /// Probe the service root
    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let response = self.client.get(self.config.endpoint("/")).send().await?;
        let body = success_body(response).await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[async_trait]
impl IngestionService for HttpDocumentService {
    async fn ingest(&self, document: &Document) -> Result<IngestReceipt, ServiceError> {
        let part = Part::bytes(document.bytes().to_vec())
            .file_name(document.file_name().to_string())
            .mime_str(document.media_type())
            .map_err(|e| ServiceError::invalid_request(format!("Invalid media type: {e}")))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(self.config.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;
        let body = success_body(response).await?;

        match serde_json::from_str(&body) {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                tracing::debug!(error = %e, "Upload succeeded with an unreadable body");
                Ok(IngestReceipt::default())
            }
        }
    }
}

#[async_trait]
impl AnswerService for HttpDocumentService {
    async fn answer(&self, question: &str) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(self.config.endpoint(CHAT_PATH))
            .json(&QuestionRequest { question })
            .send()
            .await?;
        let body = success_body(response).await?;

        let parsed: AnswerResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::malformed(format!("Failed to parse answer: {e}")))?;
        Ok(parsed.answer)
    }
}

/// Read the body, turning a non-success status into an error
async fn success_body(response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::network(format!("Failed to read response: {e}")))?;

    if status.is_success() {
        return Ok(body);
    }

    let error = ServiceError::status(status.as_u16(), format!("Service returned {status}"));
    Err(match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => error.with_detail(detail),
        Ok(ErrorBody { detail }) => error.with_detail(detail.to_string()),
        Err(_) => error,
    })
}
