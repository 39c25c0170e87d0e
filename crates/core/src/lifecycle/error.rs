//! Lifecycle error types

use mailsync_domain::MailSyncError;
use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The mail engine could not be constructed. Not retried.
    #[error("Failed to create mail engine: {0}")]
    EngineCreation(#[source] EngineError),
}

impl From<LifecycleError> for MailSyncError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::EngineCreation(inner) => inner.into(),
        }
    }
}
