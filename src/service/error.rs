//! Service error types

use thiserror::Error;

/// Failure talking to the document services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    /// HTTP status, when the service answered at all
    pub status: Option<u16>,
    /// The `detail` field of an error body, kept for logs only
    pub detail: Option<String>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            detail: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Network, message)
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ServiceErrorKind::Status, message)
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::MalformedResponse, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::network(format!("Request timeout: {e}"))
        } else if e.is_connect() || e.is_request() {
            ServiceError::network(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            ServiceError::malformed(format!("Failed to decode response: {e}"))
        } else {
            ServiceError::network(format!("Request failed: {e}"))
        }
    }
}

/// Error classification. The session only distinguishes `Network` from the
/// rest when choosing the upload alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Connection refused, timeouts, broken transfers
    Network,
    /// The service answered with a non-success status
    Status,
    /// Success status but the body is not what was expected
    MalformedResponse,
    /// The request could not be built locally; nothing was sent
    InvalidRequest,
}

impl ServiceErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Status => "status",
            Self::MalformedResponse => "malformed_response",
            Self::InvalidRequest => "invalid_request",
        }
    }
}
