//! Port interface for connectivity sources

use std::sync::Arc;

use mailsync_domain::Connection;

use super::error::ReachabilityError;

/// Invoked with the new connection on every connectivity change
pub type ConnectionCallback = Arc<dyn Fn(Connection) + Send + Sync>;

/// Source of connectivity transitions
///
/// Implementations report changes only, never repeats of the current
/// connection.
pub trait ReachabilityNotifier: Send + Sync {
    /// Start delivering changes to `callback`.
    fn start(&self, callback: ConnectionCallback) -> Result<(), ReachabilityError>;

    /// Stop delivering changes. Idempotent.
    fn stop(&self);
}
