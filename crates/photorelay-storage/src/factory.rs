//! Build the ordered list of enabled sinks from configuration.

use std::sync::Arc;

use photorelay_core::DestinationConfig;

#[cfg(feature = "sink-dropbox")]
use crate::DropboxSink;
#[cfg(feature = "sink-webdav")]
use crate::WebDavSink;
use crate::{Sink, SinkResult};
#[cfg(not(all(feature = "sink-webdav", feature = "sink-dropbox")))]
use crate::SinkError;

/// Create the sinks for every enabled destination, in the canonical
/// delivery order: WebDAV first, then Dropbox.
pub fn create_sinks(config: &DestinationConfig) -> SinkResult<Vec<Arc<dyn Sink>>> {
    let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

    #[cfg(feature = "sink-webdav")]
    if config.webdav.enabled {
        sinks.push(Arc::new(WebDavSink::new(&config.webdav)?));
    }
    #[cfg(not(feature = "sink-webdav"))]
    if config.webdav.enabled {
        return Err(SinkError::Config(
            "WebDAV backend not available (sink-webdav feature not enabled)".to_string(),
        ));
    }

    #[cfg(feature = "sink-dropbox")]
    if config.dropbox.enabled {
        sinks.push(Arc::new(DropboxSink::new(&config.dropbox)?));
    }
    #[cfg(not(feature = "sink-dropbox"))]
    if config.dropbox.enabled {
        return Err(SinkError::Config(
            "Dropbox backend not available (sink-dropbox feature not enabled)".to_string(),
        ));
    }

    Ok(sinks)
}
