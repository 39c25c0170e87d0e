//! OS lifecycle entry points
//!
//! The native shell forwards its application delegate callbacks here. Each
//! callback records the OS state on the host platform first, so the budget
//! tracker and background tasks see it, then drives the orchestrator.

use std::sync::Arc;

use mailsync_core::{Completion, LifecycleError};
use mailsync_domain::{MailSyncError, OsAppState};
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::utils::logging::error_label;

pub struct AppDelegate {
    context: Arc<AppContext>,
}

impl AppDelegate {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// `launch_state` is the OS state at launch. A launch for a background
    /// fetch reports `Background`, which starts the budget clock.
    ///
    /// # Errors
    /// Fails when the mail engine cannot be created. The host must exit.
    pub async fn did_finish_launching(&self, launch_state: OsAppState) -> anyhow::Result<()> {
        info!(?launch_state, "---- launching ----");
        self.context.platform.set_application_state(launch_state);
        self.context.orchestrator.start(None).await.map_err(|err| fatal(err, "cannot start sync"))
    }

    /// # Errors
    /// Fails when the mail engine cannot be created. The host must exit.
    pub async fn will_enter_foreground(&self) -> anyhow::Result<()> {
        info!("---- foreground ----");
        self.context.platform.set_application_state(OsAppState::Active);
        self.context
            .orchestrator
            .enter_foreground()
            .await
            .map_err(|err| fatal(err, "cannot resume sync"))
    }

    pub fn will_resign_active(&self) {
        self.context.platform.set_application_state(OsAppState::Inactive);
    }

    pub fn did_enter_background(&self) {
        info!("---- background ----");
        self.context.platform.set_application_state(OsAppState::Background);
        self.context.orchestrator.enter_background();
    }

    pub async fn will_terminate(&self) {
        info!("---- terminate ----");
        self.context.orchestrator.terminate().await;
    }

    /// The budget tracker is armed when the recorded OS state is
    /// `Background`, so the completion fires once the loops wind down.
    ///
    /// # Errors
    /// Fails when the mail engine cannot be created. The host must exit.
    pub async fn perform_background_fetch(&self, completion: Completion) -> anyhow::Result<()> {
        info!("---- background fetch ----");
        self.context
            .orchestrator
            .background_fetch(completion)
            .await
            .map_err(|err| fatal(err, "background fetch failed"))
    }

    /// The OS expiration handler: every background task is gone.
    pub async fn background_time_expired(&self) {
        let expired = self.context.platform.expire_background_tasks();
        warn!(tasks = ?expired, "background time expired");
        self.context.orchestrator.stop().await;
    }
}

fn fatal(err: LifecycleError, message: &'static str) -> anyhow::Error {
    let err = MailSyncError::from(err);
    error!(kind = error_label(&err), error = %err, "{}", message);
    anyhow::Error::new(err)
}
