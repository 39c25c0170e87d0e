//! Jobs / fetch / idle loop for one loop family

use std::sync::Arc;

use mailsync_domain::{ApplicationState, BackgroundTaskId, LoopFamily};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::completion::CompletionSlot;
use crate::engine::SharedEngine;
use crate::platform::PlatformPort;

/// Summary returned when a loop exits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub family: LoopFamily,
    pub iterations: u64,
    pub completions_fired: usize,
}

pub struct FolderLoop {
    family: LoopFamily,
    engine: SharedEngine,
    tasks: Arc<dyn PlatformPort>,
    state: watch::Receiver<ApplicationState>,
    cancel: CancellationToken,
    task_id: BackgroundTaskId,
    completions: Option<CompletionSlot>,
}

impl FolderLoop {
    /// `task_id` must already be acquired; the loop releases it on exit.
    pub fn new(
        family: LoopFamily,
        engine: SharedEngine,
        tasks: Arc<dyn PlatformPort>,
        state: watch::Receiver<ApplicationState>,
        cancel: CancellationToken,
        task_id: BackgroundTaskId,
    ) -> Self {
        Self { family, engine, tasks, state, cancel, task_id, completions: None }
    }

    /// Fire the completions queued in `slot` on exit.
    #[must_use]
    pub fn with_completions(mut self, slot: CompletionSlot) -> Self {
        self.completions = Some(slot);
        self
    }

    pub fn family(&self) -> LoopFamily {
        self.family
    }

    fn should_run(&self) -> bool {
        self.state.borrow().is_running() && !self.cancel.is_cancelled()
    }

    async fn work(&self) {
        match self.family {
            LoopFamily::Imap(folder) => {
                self.engine.perform_jobs(folder).await;
                self.engine.fetch(folder).await;
            }
            LoopFamily::Smtp => self.engine.perform_smtp_jobs().await,
        }
    }

    async fn idle(&self) {
        match self.family {
            LoopFamily::Imap(folder) => self.engine.idle(folder).await,
            LoopFamily::Smtp => self.engine.smtp_idle().await,
        }
    }

    #[instrument(name = "folder_loop", skip_all, fields(family = self.family.name(), task_id = %self.task_id))]
    pub async fn run(self) -> LoopReport {
        info!("sync loop started");
        let mut iterations = 0_u64;

        while self.should_run() {
            iterations += 1;
            self.work().await;

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!("idle interrupted by cycle cancellation");
                    break;
                }
                () = self.idle() => {}
            }
        }

        let completions_fired = self.finish();
        info!(iterations, completions_fired, "sync loop finished");

        LoopReport { family: self.family, iterations, completions_fired }
    }

    fn finish(&self) -> usize {
        let pending = self.completions.as_ref().map(CompletionSlot::drain).unwrap_or_default();

        if !self.task_id.is_valid() {
            if !pending.is_empty() {
                warn!(
                    dropped = pending.len(),
                    "no background task held, dropping background-fetch completion"
                );
            }
            return 0;
        }

        let fired = pending.len();
        for completion in pending {
            completion();
        }
        self.tasks.end_background_task(self.task_id);
        debug!("background task released");
        fired
    }
}
