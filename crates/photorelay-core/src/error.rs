//! Error types module
//!
//! Configuration errors are detected before an upload starts and carry the
//! exact message shown to the user. The pipeline never runs when one of
//! these is raised.

/// Precondition failures that prevent an upload from starting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No destination is enabled at all.
    #[error("Setup server configuration before uploading")]
    NoDestination,

    /// WebDAV is enabled but its server URL is absent or empty.
    #[error("Invalid WebDAV server URL")]
    InvalidWebDavUrl,

    /// A settings value could not be parsed (environment or CLI input).
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(
            ConfigError::NoDestination.to_string(),
            "Setup server configuration before uploading"
        );
        assert_eq!(
            ConfigError::InvalidWebDavUrl.to_string(),
            "Invalid WebDAV server URL"
        );
    }

    #[test]
    fn distinct_messages_for_distinct_failures() {
        assert_ne!(
            ConfigError::NoDestination.to_string(),
            ConfigError::InvalidWebDavUrl.to_string()
        );
    }
}
