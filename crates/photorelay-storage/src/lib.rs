//! Photorelay Storage Library
//!
//! Destination sinks for the upload pipeline. Each backend implements the
//! `Sink` trait ("accepts a name and bytes, reports success or failure");
//! the factory builds the ordered list of enabled sinks from configuration.
//!
//! # Delivery order
//!
//! The canonical attempt order is WebDAV, then Dropbox. Order is part of the
//! upload contract, not incidental; it is fixed in `create_sinks`.

#[cfg(feature = "sink-dropbox")]
pub mod dropbox;
pub mod factory;
pub mod traits;
#[cfg(feature = "sink-webdav")]
pub mod webdav;

// Re-export commonly used types
#[cfg(feature = "sink-dropbox")]
pub use dropbox::DropboxSink;
pub use factory::create_sinks;
pub use traits::{Sink, SinkError, SinkKind, SinkResult};
#[cfg(feature = "sink-webdav")]
pub use webdav::WebDavSink;
