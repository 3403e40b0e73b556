//! Dropbox destination sink
//!
//! Uploads go through the content-upload endpoint as a single request with
//! bearer auth and a `Dropbox-API-Arg` header describing the target path.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use photorelay_core::DropboxConfig;

use crate::traits::{Sink, SinkError, SinkKind, SinkResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com/2/files/upload";

/// Dropbox sink, an injected client instance owned by the composition root.
pub struct DropboxSink {
    client: reqwest::Client,
    access_token: String,
    folder: String,
    content_url: String,
}

impl DropboxSink {
    pub fn new(config: &DropboxConfig) -> SinkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(DropboxSink {
            client,
            access_token: config.access_token.clone(),
            folder: config.folder.trim_end_matches('/').to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
        })
    }

    /// Override the content endpoint (tests, API-compatible providers).
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = url.into();
        self
    }

    fn remote_path(&self, name: &str) -> String {
        if self.folder.is_empty() {
            format!("/{}", name)
        } else if self.folder.starts_with('/') {
            format!("{}/{}", self.folder, name)
        } else {
            format!("/{}/{}", self.folder, name)
        }
    }
}

#[async_trait]
impl Sink for DropboxSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Dropbox
    }

    async fn upload(&self, name: &str, data: Bytes) -> SinkResult<()> {
        let path = self.remote_path(name);
        let size = data.len();
        let api_arg = serde_json::json!({
            "path": path,
            "mode": "add",
            "autorename": true,
            "mute": true,
        })
        .to_string();

        let response = self
            .client
            .post(&self.content_url)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", api_arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!(path = %path, size_bytes = size, "Dropbox upload successful");
            Ok(())
        } else {
            tracing::error!(path = %path, status = status.as_u16(), "Dropbox upload rejected");
            Err(SinkError::Status {
                status: status.as_u16(),
            })
        }
    }
}
