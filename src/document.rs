//! Documents selected for ingestion

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors reading a document from disk
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
}

/// An opaque document payload.
///
/// Bytes are forwarded to the ingestion service unmodified. The payload is
/// shared, so cloning a `Document` does not copy the file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    file_name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let media_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            media_type,
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(DocumentError::NotAFile(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "document".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self::new(file_name, bytes))
    }

    /// Override the guessed media type
    #[cfg(test)]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Advisory filter on which files the user is offered.
///
/// The ingestion service decides what it accepts; this only narrows the
/// selection in the presentation layer.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    extensions: Vec<&'static str>,
    label: &'static str,
}

impl DocumentFilter {
    pub fn pdf() -> Self {
        Self {
            extensions: vec!["pdf"],
            label: "PDF",
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }

    /// Human-readable name of the accepted format
    pub fn label(&self) -> &'static str {
        self.label
    }
}
