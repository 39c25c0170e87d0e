//! Connectivity pushed by the native layer

use mailsync_core::reachability::{ConnectionCallback, ReachabilityError, ReachabilityNotifier};
use mailsync_domain::Connection;
use parking_lot::Mutex;
use tracing::debug;

/// Notifier fed by the host's own reachability API
///
/// The last pushed connection survives `stop`/`start`, so a restart does not
/// re-announce an unchanged link.
#[derive(Default)]
pub struct HostReachability {
    callback: Mutex<Option<ConnectionCallback>>,
    last: Mutex<Option<Connection>>,
}

impl HostReachability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the current connection. Repeats are ignored.
    ///
    /// Returns whether the value was a change.
    pub fn push(&self, connection: Connection) -> bool {
        {
            let mut last = self.last.lock();
            if *last == Some(connection) {
                return false;
            }
            *last = Some(connection);
        }
        debug!(%connection, "host connectivity changed");

        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(connection);
        }
        true
    }

    pub fn current(&self) -> Option<Connection> {
        *self.last.lock()
    }

    pub fn is_started(&self) -> bool {
        self.callback.lock().is_some()
    }
}

impl ReachabilityNotifier for HostReachability {
    fn start(&self, callback: ConnectionCallback) -> Result<(), ReachabilityError> {
        let mut slot = self.callback.lock();
        if slot.is_some() {
            return Err(ReachabilityError::AlreadyStarted);
        }
        *slot = Some(callback);
        Ok(())
    }

    fn stop(&self) {
        self.callback.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn recorder() -> (ConnectionCallback, Arc<Mutex<Vec<Connection>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (Arc::new(move |c: Connection| sink.lock().push(c)), seen)
    }

    #[test]
    fn test_only_changes_reach_callback() {
        let host = HostReachability::new();
        let (callback, seen) = recorder();
        host.start(callback).unwrap();

        assert!(host.push(Connection::Wifi));
        assert!(!host.push(Connection::Wifi));
        assert!(host.push(Connection::None));

        assert_eq!(*seen.lock(), vec![Connection::Wifi, Connection::None]);
    }

    #[test]
    fn test_double_start_fails() {
        let host = HostReachability::new();
        host.start(recorder().0).unwrap();

        assert!(matches!(host.start(recorder().0), Err(ReachabilityError::AlreadyStarted)));
    }

    #[test]
    fn test_stopped_notifier_tracks_state_silently() {
        let host = HostReachability::new();
        let (callback, seen) = recorder();
        host.start(callback).unwrap();
        host.stop();

        host.push(Connection::Cellular);
        assert!(seen.lock().is_empty());
        assert_eq!(host.current(), Some(Connection::Cellular));

        let (callback, seen) = recorder();
        host.start(callback).unwrap();
        assert!(!host.push(Connection::Cellular));
        assert!(seen.lock().is_empty());
    }
}
