//! Screen-side upload session.
//!
//! Tracks the editable display name across pipeline runs: success clears it
//! (a fresh default is generated for the next shot), failure preserves it so
//! the user can retry in place.

use bytes::Bytes;
use photorelay_core::{default_display_name, UploadOutcome, UploadRequest};

/// Mutable state that outlives individual pipeline runs.
#[derive(Clone, Debug)]
pub struct UploadSession {
    display_name: String,
}

impl UploadSession {
    /// Start a session with a timestamp default name.
    pub fn new() -> Self {
        UploadSession {
            display_name: default_display_name(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Build the request for one run. An empty name falls back to a
    /// timestamp default at run time.
    pub fn request(&self, image: Bytes, save_to_album: bool) -> UploadRequest {
        UploadRequest {
            image,
            display_name: self.display_name.clone(),
            save_to_album,
        }
    }

    /// Apply a terminal outcome: success clears the name, failure keeps it.
    pub fn apply_outcome(&mut self, outcome: UploadOutcome) {
        if outcome.is_success() {
            self.display_name.clear();
        }
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_clears_display_name() {
        let mut session = UploadSession::new();
        session.set_display_name("holiday");
        session.apply_outcome(UploadOutcome::Success);
        assert_eq!(session.display_name(), "");
    }

    #[test]
    fn failure_preserves_display_name() {
        let mut session = UploadSession::new();
        session.set_display_name("holiday");
        session.apply_outcome(UploadOutcome::Failure);
        assert_eq!(session.display_name(), "holiday");
    }

    #[test]
    fn new_session_has_timestamp_default() {
        let session = UploadSession::new();
        assert_eq!(session.display_name().len(), 15);
    }

    #[test]
    fn request_carries_session_name() {
        let mut session = UploadSession::new();
        session.set_display_name("holiday");
        let request = session.request(Bytes::from_static(b"img"), true);
        assert_eq!(request.display_name, "holiday");
        assert!(request.save_to_album);
    }
}
