//! Configuration module
//!
//! Destination and photo settings are explicit values built once by the
//! composition root and passed into the pipeline. Nothing in the pipeline
//! reads ambient global state. `from_env` constructors exist for binaries
//! that configure through the environment.

use std::env;

use crate::error::ConfigError;
use crate::tiers::{QualityTier, ResolutionTier};

/// WebDAV destination parameters.
#[derive(Clone, Debug, Default)]
pub struct WebDavConfig {
    pub enabled: bool,
    /// Base server URL, e.g. "https://dav.example.com/photos".
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Directory under the base URL that uploads land in. Empty means the
    /// base URL itself.
    pub directory: String,
}

/// Dropbox destination parameters.
#[derive(Clone, Debug, Default)]
pub struct DropboxConfig {
    pub enabled: bool,
    pub access_token: String,
    /// Remote folder path, e.g. "/photorelay".
    pub folder: String,
}

/// The set of configured destinations. Each sink is enabled independently;
/// the canonical attempt order (WebDAV, then Dropbox) is part of the upload
/// contract and lives in the sink factory.
#[derive(Clone, Debug, Default)]
pub struct DestinationConfig {
    pub webdav: WebDavConfig,
    pub dropbox: DropboxConfig,
}

impl DestinationConfig {
    /// Whether at least one destination is enabled.
    pub fn any_enabled(&self) -> bool {
        self.webdav.enabled || self.dropbox.enabled
    }

    /// Validate preconditions before an upload may start.
    ///
    /// Fails when no destination is enabled, or when WebDAV is enabled with
    /// an absent or empty server URL. The messages are user-facing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.any_enabled() {
            return Err(ConfigError::NoDestination);
        }
        if self.webdav.enabled && self.webdav.url.trim().is_empty() {
            return Err(ConfigError::InvalidWebDavUrl);
        }
        Ok(())
    }

    /// Build from environment variables.
    ///
    /// `WEBDAV_ENABLED`, `WEBDAV_URL`, `WEBDAV_USERNAME`, `WEBDAV_PASSWORD`,
    /// `WEBDAV_DIRECTORY`, `DROPBOX_ENABLED`, `DROPBOX_ACCESS_TOKEN`,
    /// `DROPBOX_FOLDER`.
    pub fn from_env() -> Self {
        DestinationConfig {
            webdav: WebDavConfig {
                enabled: env_bool("WEBDAV_ENABLED", false),
                url: env_string("WEBDAV_URL"),
                username: env::var("WEBDAV_USERNAME").ok(),
                password: env::var("WEBDAV_PASSWORD").ok(),
                directory: env_string("WEBDAV_DIRECTORY"),
            },
            dropbox: DropboxConfig {
                enabled: env_bool("DROPBOX_ENABLED", false),
                access_token: env_string("DROPBOX_ACCESS_TOKEN"),
                folder: env_string("DROPBOX_FOLDER"),
            },
        }
    }
}

/// Photo processing settings for one upload run.
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadSettings {
    pub resolution: ResolutionTier,
    pub quality: QualityTier,
    /// Global save-to-album preference. A copy of the transformed photo is
    /// only persisted when both this and the request flag are set.
    pub save_to_album: bool,
}

impl UploadSettings {
    /// Build from `PHOTO_RESOLUTION`, `PHOTO_QUALITY` (tier name or legacy
    /// 0/1/2 index) and `PHOTO_SAVE_TO_ALBUM`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let resolution = match env::var("PHOTO_RESOLUTION") {
            Ok(value) => ResolutionTier::parse(&value)?,
            Err(_) => ResolutionTier::default(),
        };
        let quality = match env::var("PHOTO_QUALITY") {
            Ok(value) => QualityTier::parse(&value)?,
            Err(_) => QualityTier::default(),
        };
        Ok(UploadSettings {
            resolution,
            quality,
            save_to_album: env_bool("PHOTO_SAVE_TO_ALBUM", false),
        })
    }
}

fn env_string(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
