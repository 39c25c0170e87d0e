//! Host-driven background task registry and app status
//!
//! Models the OS side of background execution: a fixed budget starts
//! running down when the app enters the background, and task ids are only
//! handed out while some of it is left.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//!
//! use mailsync_core::{AppStatusProvider, BackgroundTasks};
//! use mailsync_domain::OsAppState;
//! use mailsync_infra::platform::HostPlatform;
//!
//! let platform = HostPlatform::new(Duration::from_secs(180));
//! platform.set_application_state(OsAppState::Background);
//!
//! let id = platform.begin_background_task("imap-inbox");
//! assert!(id.is_valid());
//! assert!(platform.background_time_remaining() <= Duration::from_secs(180));
//! platform.end_background_task(id);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use mailsync_common::time::{Clock, SystemClock};
use mailsync_core::{AppStatusProvider, BackgroundTasks};
use mailsync_domain::{BackgroundTaskId, OsAppState};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct HostStatus {
    state: OsAppState,
    background_since: Option<Instant>,
}

pub struct HostPlatform {
    clock: Arc<dyn Clock>,
    budget: Duration,
    status: RwLock<HostStatus>,
    tasks: DashMap<BackgroundTaskId, String>,
    next_id: AtomicU64,
}

impl HostPlatform {
    pub fn new(budget: Duration) -> Self {
        Self::with_clock(budget, Arc::new(SystemClock))
    }

    pub fn with_clock(budget: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            budget,
            status: RwLock::new(HostStatus { state: OsAppState::Active, background_since: None }),
            tasks: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Record the OS application state reported by the native layer.
    ///
    /// The background budget restarts each time the app enters
    /// `Background` from another state.
    pub fn set_application_state(&self, state: OsAppState) {
        let mut status = self.status.write();
        if status.state == state {
            return;
        }

        status.background_since = match state {
            OsAppState::Background => Some(self.clock.now()),
            OsAppState::Active | OsAppState::Inactive => None,
        };
        debug!(from = ?status.state, to = ?state, "host application state");
        status.state = state;
    }

    /// Drop every live task, as the OS does when the budget runs out.
    ///
    /// Returns the names of the expired tasks.
    pub fn expire_background_tasks(&self) -> Vec<String> {
        let ids: Vec<BackgroundTaskId> = self.tasks.iter().map(|entry| *entry.key()).collect();
        let mut expired = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some((_, name)) = self.tasks.remove(&id) {
                warn!(task_id = %id, task = %name, "background task expired");
                expired.push(name);
            }
        }

        expired
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl BackgroundTasks for HostPlatform {
    fn begin_background_task(&self, name: &str) -> BackgroundTaskId {
        let in_background = self.status.read().state == OsAppState::Background;
        if in_background && self.background_time_remaining().is_zero() {
            info!(task = name, "background budget spent, task refused");
            return BackgroundTaskId::INVALID;
        }

        let id = BackgroundTaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.tasks.insert(id, name.to_string());
        debug!(task_id = %id, task = name, "background task begun");
        id
    }

    fn end_background_task(&self, id: BackgroundTaskId) {
        match self.tasks.remove(&id) {
            Some((_, name)) => debug!(task_id = %id, task = %name, "background task ended"),
            None => debug!(task_id = %id, "ending unknown background task"),
        }
    }
}

impl AppStatusProvider for HostPlatform {
    fn application_state(&self) -> OsAppState {
        self.status.read().state
    }

    fn background_time_remaining(&self) -> Duration {
        let status = *self.status.read();
        match status.background_since {
            Some(since) => self.budget.saturating_sub(self.clock.since(since)),
            None => Duration::MAX,
        }
    }
}
