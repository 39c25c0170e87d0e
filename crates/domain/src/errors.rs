//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for mailsync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MailSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mail engine error: {0}")]
    Engine(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MailSyncError {
    /// Whether the error means the process cannot keep running.
    ///
    /// Only a broken engine build or configuration qualifies; everything else
    /// degrades gracefully.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Engine(_) | Self::Config(_))
    }
}

/// Result type alias for mailsync operations
pub type Result<T> = std::result::Result<T, MailSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_with_tag() {
        let err = MailSyncError::Engine("context_new returned null".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"type":"Engine","message":"context_new returned null"}"#);
    }

    #[test]
    fn test_only_engine_and_config_errors_are_fatal() {
        assert!(MailSyncError::Engine("x".into()).is_fatal());
        assert!(MailSyncError::Config("x".into()).is_fatal());
        assert!(!MailSyncError::Network("x".into()).is_fatal());
        assert!(!MailSyncError::Platform("x".into()).is_fatal());
    }
}
