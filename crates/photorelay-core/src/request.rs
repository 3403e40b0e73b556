//! Upload request and outcome types.

use bytes::Bytes;
use chrono::Local;

/// One user-initiated upload. Immutable for the duration of a pipeline run
/// and owned exclusively by that invocation.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Source image bytes in any decodable format.
    pub image: Bytes,
    /// Name the upload is stored under (without extension).
    pub display_name: String,
    /// Request-level save-to-album flag; combined with the global setting.
    pub save_to_album: bool,
}

impl UploadRequest {
    pub fn new(image: Bytes, display_name: impl Into<String>) -> Self {
        UploadRequest {
            image,
            display_name: display_name.into(),
            save_to_album: true,
        }
    }

    /// Effective name for this run: the display name, or a timestamp default
    /// when it is empty.
    pub fn effective_name(&self) -> String {
        if self.display_name.trim().is_empty() {
            default_display_name()
        } else {
            self.display_name.clone()
        }
    }
}

/// Terminal result of one pipeline run. Exactly one is produced per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failure,
}

impl UploadOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}

/// Timestamp-based default name, `yyyyMMdd_HHmmss` in local time.
pub fn default_display_name() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}
