//! Reachability monitor
//!
//! Turns raw [`Connection`] changes into [`Reachability`] and hands them to
//! a single subscriber. Failing to start the underlying notifier is not
//! fatal: sync then relies on its own fetch cycles only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mailsync_domain::{Connection, Reachability};
use tracing::{debug, info, warn};

use super::ports::{ConnectionCallback, ReachabilityNotifier};

/// Subscriber invoked synchronously with each classified change
pub type ReachabilityHandler = Arc<dyn Fn(Reachability) + Send + Sync>;

pub struct ReachabilityMonitor {
    notifier: Arc<dyn ReachabilityNotifier>,
    subscribed: AtomicBool,
}

impl ReachabilityMonitor {
    pub fn new(notifier: Arc<dyn ReachabilityNotifier>) -> Self {
        Self { notifier, subscribed: AtomicBool::new(false) }
    }

    /// Collapse a connection into reachable / unreachable.
    pub fn classify(connection: Connection) -> Reachability {
        Reachability::from(connection)
    }

    /// Start the notifier and route its changes to `handler`.
    ///
    /// An existing subscription is replaced. Returns `false` when the
    /// notifier could not be started.
    pub fn subscribe(&self, handler: ReachabilityHandler) -> bool {
        if self.subscribed.swap(false, Ordering::SeqCst) {
            debug!("replacing existing reachability subscription");
            self.notifier.stop();
        }

        let callback: ConnectionCallback = Arc::new(move |connection: Connection| {
            let reachability = Self::classify(connection);
            match reachability {
                Reachability::Reachable(via) => info!(via = %via, "network: reachable"),
                Reachability::Unreachable => info!("network: not reachable"),
            }
            handler(reachability);
        });

        match self.notifier.start(callback) {
            Ok(()) => {
                self.subscribed.store(true, Ordering::SeqCst);
                debug!("reachability notifier started");
                true
            }
            Err(err) => {
                warn!(error = %err, "could not start reachability notifier");
                false
            }
        }
    }

    /// Stop the notifier. Safe to call when not subscribed.
    pub fn unsubscribe(&self) {
        if self.subscribed.swap(false, Ordering::SeqCst) {
            self.notifier.stop();
            debug!("reachability notifier stopped");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }
}
