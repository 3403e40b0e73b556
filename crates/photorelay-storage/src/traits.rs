//! Sink abstraction trait
//!
//! This module defines the Sink trait that all destination backends must
//! implement. The delivery loop only ever sees this trait, so it stays
//! decoupled from the concrete protocols.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Sink operation errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Destination returned status {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// The kind of a destination sink. Determines the progress label and the
/// position in the canonical delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    WebDav,
    Dropbox,
}

impl SinkKind {
    /// Label shown in the progress overlay while this sink is active.
    pub fn label(self) -> &'static str {
        match self {
            SinkKind::WebDav => "WebDAV",
            SinkKind::Dropbox => "Dropbox",
        }
    }
}

/// A configured upload destination.
///
/// One attempt per upload, no retry. The pipeline treats any error as
/// terminal for the whole request.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Which backend this sink is (used for labels and ordering).
    fn kind(&self) -> SinkKind;

    /// Deliver the payload under the given object name.
    async fn upload(&self, name: &str, data: Bytes) -> SinkResult<()>;
}

impl From<reqwest::Error> for SinkError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            SinkError::Network(error.to_string())
        } else {
            SinkError::UploadFailed(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(SinkKind::WebDav.label(), "WebDAV");
        assert_eq!(SinkKind::Dropbox.label(), "Dropbox");
    }
}
