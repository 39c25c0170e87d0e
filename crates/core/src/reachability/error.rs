//! Reachability error types

use mailsync_domain::MailSyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReachabilityError {
    /// The notifier cannot run in this environment.
    #[error("Reachability notifier unavailable: {0}")]
    Unavailable(String),

    #[error("Reachability notifier already started")]
    AlreadyStarted,

    #[error("Reachability probe failed: {0}")]
    Probe(String),
}

impl From<ReachabilityError> for MailSyncError {
    fn from(err: ReachabilityError) -> Self {
        Self::Network(err.to_string())
    }
}
