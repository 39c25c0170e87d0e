//! TCP connect probe
//!
//! For hosts without a reachability API. A successful connect counts as
//! [`Connection::Wifi`]; a probe cannot tell link types apart.

use std::time::Duration;

use mailsync_core::reachability::{ConnectionCallback, ReachabilityError, ReachabilityNotifier};
use mailsync_domain::{Connection, ReachabilityConfig};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct ProbeReachability {
    addr: String,
    interval: Duration,
    timeout: Duration,
    running: Mutex<Option<CancellationToken>>,
}

impl ProbeReachability {
    pub fn new(addr: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self { addr: addr.into(), interval, timeout, running: Mutex::new(None) }
    }

    /// `None` when no probe address is configured.
    pub fn from_config(config: &ReachabilityConfig) -> Option<Self> {
        config.probe_addr.as_ref().map(|addr| {
            Self::new(
                addr.clone(),
                Duration::from_secs(config.probe_interval_secs),
                Duration::from_millis(config.probe_timeout_ms),
            )
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    async fn probe(addr: &str, timeout: Duration) -> Connection {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Connection::Wifi,
            Ok(Err(err)) => {
                debug!(addr, error = %err, "probe connect failed");
                Connection::None
            }
            Err(_) => {
                debug!(addr, "probe timed out");
                Connection::None
            }
        }
    }
}

impl ReachabilityNotifier for ProbeReachability {
    fn start(&self, callback: ConnectionCallback) -> Result<(), ReachabilityError> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Err(ReachabilityError::AlreadyStarted);
        }
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|err| ReachabilityError::Unavailable(err.to_string()))?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let addr = self.addr.clone();
        let (interval, timeout) = (self.interval, self.timeout);

        handle.spawn(async move {
            let mut last = None;
            loop {
                let connection = Self::probe(&addr, timeout).await;
                if last != Some(connection) {
                    last = Some(connection);
                    callback(connection);
                }

                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }
            }
            debug!(addr = %addr, "reachability probe stopped");
        });

        info!(addr = %self.addr, interval_secs = interval.as_secs_f64(), "reachability probe started");
        *running = Some(cancel);
        Ok(())
    }

    fn stop(&self) {
        if let Some(cancel) = self.running.lock().take() {
            cancel.cancel();
        }
    }
}

impl Drop for ProbeReachability {
    fn drop(&mut self) {
        self.stop();
    }
}
