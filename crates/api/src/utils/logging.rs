//! Tracing setup and logging helpers

use mailsync_domain::MailSyncError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV: &str = "MAILSYNC_LOG";

/// Environment variable selecting the output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "MAILSYNC_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read the format from [`LOG_FORMAT_ENV`], defaulting to pretty.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Build the filter from [`LOG_FILTER_ENV`], falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("info,mailsync_core=debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Install the global subscriber.
///
/// Calling it again after a subscriber is installed is a no-op that returns
/// `false`.
pub fn init_tracing(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter()).with_target(true);
    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

/// Stable label for a `MailSyncError`, suitable for structured log fields.
#[inline]
pub fn error_label(error: &MailSyncError) -> &'static str {
    match error {
        MailSyncError::Config(_) => "config",
        MailSyncError::Engine(_) => "engine",
        MailSyncError::Platform(_) => "platform",
        MailSyncError::Network(_) => "network",
        MailSyncError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_labels_are_stable() {
        assert_eq!(error_label(&MailSyncError::Engine("x".into())), "engine");
        assert_eq!(error_label(&MailSyncError::Network("x".into())), "network");
    }

    #[test]
    fn test_second_init_is_noop() {
        init_tracing(LogFormat::Pretty);
        assert!(!init_tracing(LogFormat::Json));
    }
}
