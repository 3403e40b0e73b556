//! Photorelay Core Library
//!
//! This crate provides the domain types shared across all Photorelay
//! components: the upload request/outcome model, resolution and quality
//! tiers, and destination configuration with its validation rules.

pub mod config;
pub mod error;
pub mod request;
pub mod tiers;

// Re-export commonly used types
pub use config::{DestinationConfig, DropboxConfig, UploadSettings, WebDavConfig};
pub use error::ConfigError;
pub use request::{default_display_name, UploadOutcome, UploadRequest};
pub use tiers::{QualityTier, ResolutionTier};
