//! Conversions from external infrastructure errors into domain errors.

use mailsync_core::ReachabilityError;
use mailsync_domain::MailSyncError;
use thiserror::Error;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub MailSyncError);

impl From<InfraError> for MailSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MailSyncError> for InfraError {
    fn from(value: MailSyncError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* config sources → MailSyncError::Config */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(err: std::io::Error) -> Self {
        Self(MailSyncError::Config(format!("Failed to read config file: {err}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(err: toml::de::Error) -> Self {
        Self(MailSyncError::Config(format!("Invalid TOML format: {err}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self(MailSyncError::Config(format!("Invalid JSON format: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* connectivity → MailSyncError::Network */
/* -------------------------------------------------------------------------- */

impl From<ReachabilityError> for InfraError {
    fn from(err: ReachabilityError) -> Self {
        Self(err.into())
    }
}
