//! Mail engine error types

use std::path::PathBuf;

use mailsync_domain::MailSyncError;
use thiserror::Error;

/// Errors surfaced by the mail engine port
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine handle could not be created. Indicates a broken build or
    /// configuration; never retried.
    #[error("Mail engine creation failed: {0}")]
    CreationFailed(String),

    /// The database could not be opened.
    #[error("Failed to open database {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
}

impl From<EngineError> for MailSyncError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err.to_string())
    }
}

/// Convenience type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
