//! WebDAV destination sink
//!
//! Uploads are a single HTTP PUT of the encoded payload to
//! `{base_url}/{directory}/{name}`, with optional basic auth.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use photorelay_core::WebDavConfig;

use crate::traits::{Sink, SinkError, SinkKind, SinkResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters escaped in a path segment of the object URL.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// WebDAV sink. Construction requires the configured server URL.
#[derive(Debug)]
pub struct WebDavSink {
    client: reqwest::Client,
    base_url: String,
    directory: String,
    username: Option<String>,
    password: Option<String>,
}

impl WebDavSink {
    pub fn new(config: &WebDavConfig) -> SinkResult<Self> {
        if config.url.trim().is_empty() {
            return Err(SinkError::Config(
                "WebDAV server URL not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(WebDavSink {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            directory: config.directory.trim_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn object_url(&self, name: &str) -> String {
        let encoded = utf8_percent_encode(name, PATH_SEGMENT);
        if self.directory.is_empty() {
            format!("{}/{}", self.base_url, encoded)
        } else {
            format!("{}/{}/{}", self.base_url, self.directory, encoded)
        }
    }
}

#[async_trait]
impl Sink for WebDavSink {
    fn kind(&self) -> SinkKind {
        SinkKind::WebDav
    }

    async fn upload(&self, name: &str, data: Bytes) -> SinkResult<()> {
        let url = self.object_url(name);
        let size = data.len();

        let mut request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(data);
        if let Some(ref username) = self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!(url = %url, size_bytes = size, "WebDAV upload successful");
            Ok(())
        } else {
            tracing::error!(url = %url, status = status.as_u16(), "WebDAV upload rejected");
            Err(SinkError::Status {
                status: status.as_u16(),
            })
        }
    }
}
