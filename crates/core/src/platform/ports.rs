//! Port interfaces for the host platform
//!
//! These traits define the boundaries between the lifecycle core and the
//! native layer hosting it.

use std::time::Duration;

use mailsync_domain::{BackgroundTaskId, OsAppState};

/// OS-granted background execution
pub trait BackgroundTasks: Send + Sync {
    /// Ask for background runtime on behalf of `name`.
    ///
    /// Returns [`BackgroundTaskId::INVALID`] when the platform refuses.
    fn begin_background_task(&self, name: &str) -> BackgroundTaskId;

    /// Give the runtime back. Ending an unknown or already expired id is a
    /// no-op.
    fn end_background_task(&self, id: BackgroundTaskId);
}

/// OS view of the application
pub trait AppStatusProvider: Send + Sync {
    fn application_state(&self) -> OsAppState;

    /// Estimated background time left. Platforms report a very large value
    /// while in the foreground.
    fn background_time_remaining(&self) -> Duration;
}

/// Combined platform port handed to the orchestrator
pub trait PlatformPort: BackgroundTasks + AppStatusProvider {}

impl<T: BackgroundTasks + AppStatusProvider> PlatformPort for T {}

/// Folder watch flags, read once per start cycle
pub trait SyncSettings: Send + Sync {
    fn watch_sentbox(&self) -> bool;
    fn watch_mvbox(&self) -> bool;
}
