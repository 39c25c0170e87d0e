//! Lifecycle orchestrator
//!
//! Drives the sync loops from OS lifecycle callbacks. Every start cycle gets
//! its own [`CancellationToken`]; `stop()` and `close()` cancel it and
//! interrupt the engine's idle calls, and the loops exit on their own.
//!
//! ```no_run
//! use mailsync_core::lifecycle::Orchestrator;
//!
//! # async fn example(orchestrator: Orchestrator) -> Result<(), mailsync_core::lifecycle::LifecycleError> {
//! orchestrator.start(None).await?;
//! orchestrator.enter_background();
//! // ... budget tracker calls stop() when background time runs out ...
//! orchestrator.terminate().await;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use futures::future::join_all;
use mailsync_domain::{
    AppConfig, ApplicationState, FolderKind, LifecycleEvent, LoopFamily, OsAppState, Reachability,
};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::LifecycleError;
use super::events::EventBus;
use super::state::SharedAppState;
use crate::budget::{BudgetOutcome, BudgetPolicy, BudgetTracker};
use crate::engine::{parse_core_info, CoreInfo, MailEngineFactory, SharedEngine};
use crate::platform::{PlatformPort, SyncSettings};
use crate::reachability::{ReachabilityHandler, ReachabilityMonitor, ReachabilityNotifier};
use crate::sync::{Completion, CompletionSlot, FolderLoop, LoopReport};

/// Static orchestrator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub engine_label: String,
    pub database_path: PathBuf,
    pub budget: BudgetPolicy,
}

impl From<&AppConfig> for OrchestratorOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            engine_label: config.engine_label.clone(),
            database_path: config.storage.database_path(),
            budget: BudgetPolicy::from(&config.background),
        }
    }
}

/// Collaborators the orchestrator talks to
#[derive(Clone)]
pub struct OrchestratorPorts {
    pub factory: Arc<dyn MailEngineFactory>,
    pub platform: Arc<dyn PlatformPort>,
    pub settings: Arc<dyn SyncSettings>,
    pub notifier: Arc<dyn ReachabilityNotifier>,
}

/// Loops of the current start cycle
struct Cycle {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<LoopReport>>,
    completions: Option<CompletionSlot>,
}

impl Default for Cycle {
    fn default() -> Self {
        Self { cancel: CancellationToken::new(), handles: Vec::new(), completions: None }
    }
}

struct Inner {
    options: OrchestratorOptions,
    factory: Arc<dyn MailEngineFactory>,
    platform: Arc<dyn PlatformPort>,
    settings: Arc<dyn SyncSettings>,
    reachability: ReachabilityMonitor,
    state: SharedAppState,
    events: EventBus,
    engine: RwLock<Option<SharedEngine>>,
    cycle: AsyncMutex<Cycle>,
    budget: Mutex<Option<CancellationToken>>,
    spawned: AtomicUsize,
    active: Arc<AtomicUsize>,
}

impl Inner {
    fn engine(&self) -> Option<SharedEngine> {
        self.engine.read().clone()
    }

    fn transition(&self, to: ApplicationState) {
        let from = self.state.replace(to);
        if from != to {
            info!(%from, %to, "application state changed");
            self.events.publish(LifecycleEvent::ApplicationStateChanged { from, to });
        }
    }

    fn interrupt_loops(&self, cycle: &Cycle) {
        cycle.cancel.cancel();
        if let Some(engine) = self.engine() {
            for folder in FolderKind::ALL {
                engine.interrupt_idle(folder);
            }
            engine.interrupt_smtp_idle();
        }
    }

    fn cancel_budget(&self) {
        if let Some(token) = self.budget.lock().take() {
            token.cancel();
            debug!("budget tracker cancelled");
        }
    }

    fn on_reachability(&self, reachability: Reachability) {
        match reachability {
            Reachability::Reachable(_) => {
                if let Some(engine) = self.engine() {
                    engine.maybe_network();
                }
                self.events.publish(LifecycleEvent::online());
            }
            Reachability::Unreachable => {
                self.events.publish(LifecycleEvent::offline());
            }
        }
    }
}

/// Decrements the active-loop counter when a loop task ends, even on panic
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cloneable handle to the lifecycle state machine
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    /// Create a stopped orchestrator. No engine exists until the first start.
    pub fn new(options: OrchestratorOptions, ports: OrchestratorPorts) -> Self {
        let inner = Inner {
            options,
            factory: ports.factory,
            platform: ports.platform,
            settings: ports.settings,
            reachability: ReachabilityMonitor::new(ports.notifier),
            state: SharedAppState::default(),
            events: EventBus::new(),
            engine: RwLock::new(None),
            cycle: AsyncMutex::new(Cycle::default()),
            budget: Mutex::new(None),
            spawned: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
        };
        Self { inner: Arc::new(inner) }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Enter `Running` and spawn the sync loops.
    ///
    /// When already running no loop is spawned; `on_background_fetch_complete`
    /// is then attached to the running Inbox loop instead. The completion
    /// fires once, when the Inbox loop exits while holding a background task.
    #[instrument(skip_all, fields(with_completion = on_background_fetch_complete.is_some()))]
    pub async fn start(
        &self,
        on_background_fetch_complete: Option<Completion>,
    ) -> Result<(), LifecycleError> {
        let mut cycle = self.inner.cycle.lock().await;

        if self.inner.state.get().is_running() {
            debug!("already running, no loops spawned");
            if let Some(completion) = on_background_fetch_complete {
                let attached = match &cycle.completions {
                    Some(slot) => slot.attach(completion).is_ok(),
                    None => false,
                };
                if !attached {
                    warn!("inbox loop already finished, dropping background-fetch completion");
                }
            }
            return Ok(());
        }

        let engine = self.ensure_engine().await?;

        let previous = std::mem::take(&mut cycle.handles);
        if !previous.is_empty() {
            debug!(count = previous.len(), "waiting for previous sync loops");
            for result in join_all(previous).await {
                match result {
                    Ok(report) => debug!(
                        family = report.family.name(),
                        iterations = report.iterations,
                        "previous sync loop joined"
                    ),
                    Err(err) => warn!(error = %err, "sync loop task failed"),
                }
            }
        }

        self.inner.transition(ApplicationState::Running);

        let cancel = CancellationToken::new();
        let completions = CompletionSlot::new();
        if let Some(completion) = on_background_fetch_complete {
            // Fresh slot, cannot be closed yet.
            let _ = completions.attach(completion);
        }

        let handles = self
            .loop_plan()
            .into_iter()
            .map(|family| {
                let slot = (family == LoopFamily::Imap(FolderKind::Inbox))
                    .then(|| completions.clone());
                self.spawn_loop(family, &engine, &cancel, slot)
            })
            .collect();

        *cycle = Cycle { cancel, handles, completions: Some(completions) };
        drop(cycle);

        self.subscribe_reachability();
        for (key, value) in parse_core_info(&engine.get_info()) {
            info!(%key, %value, "core info");
        }

        Ok(())
    }

    /// Enter `Background` and interrupt every loop. Does not wait for them.
    #[instrument(skip_all)]
    pub async fn stop(&self) {
        let cycle = self.inner.cycle.lock().await;
        self.inner.transition(ApplicationState::Background);
        self.inner.interrupt_loops(&cycle);
    }

    /// Enter `Stopped` and release the engine. A second call is a no-op.
    #[instrument(skip_all)]
    pub async fn close(&self) {
        let cycle = self.inner.cycle.lock().await;
        self.inner.transition(ApplicationState::Stopped);
        self.inner.interrupt_loops(&cycle);
        self.inner.cancel_budget();
        drop(cycle);

        let engine = self.inner.engine.write().take();
        match engine {
            Some(engine) => {
                engine.close().await;
                info!("mail engine closed");
            }
            None => debug!("no mail engine to close"),
        }
    }

    /// Arm the background budget tracker, replacing a previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn maybe_stop(&self) {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.inner.budget.lock().replace(cancel.clone()) {
            previous.cancel();
        }

        let tracker = BudgetTracker::new(self.inner.platform.clone(), self.inner.options.budget);
        let weak = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            match tracker.run(cancel.clone()).await {
                BudgetOutcome::Exhausted { .. } => {
                    if let Some(orchestrator) = Self::from_weak(&weak) {
                        orchestrator.stop_if_armed(&cancel).await;
                    }
                }
                outcome => debug!(?outcome, "budget tracker finished"),
            }
        });
        debug!("budget tracker armed");
    }

    /// `stop()` on behalf of the tracker owning `token`, unless the tracker
    /// was cancelled after its last check.
    async fn stop_if_armed(&self, token: &CancellationToken) {
        let cycle = self.inner.cycle.lock().await;
        if token.is_cancelled() {
            debug!("budget tracker cancelled after exhaustion, not stopping");
            return;
        }
        self.inner.transition(ApplicationState::Background);
        self.inner.interrupt_loops(&cycle);
    }

    /// The app left the foreground: stop listening for connectivity and arm
    /// the budget tracker. Loops keep running until the budget runs low.
    pub fn enter_background(&self) {
        self.inner.reachability.unsubscribe();
        self.maybe_stop();
    }

    /// The app is back in the foreground: disarm the budget tracker, start
    /// the loops if they were stopped and listen for connectivity again.
    ///
    /// # Errors
    /// Fails when the mail engine cannot be created.
    pub async fn enter_foreground(&self) -> Result<(), LifecycleError> {
        self.inner.cancel_budget();
        self.start(None).await?;
        if !self.inner.reachability.is_subscribed() {
            self.subscribe_reachability();
        }
        Ok(())
    }

    /// Start for an OS background-fetch request.
    ///
    /// Also arms the budget tracker when the OS reports the app as
    /// backgrounded, so the loops wind down before the budget is gone.
    ///
    /// # Errors
    /// Fails when the mail engine cannot be created.
    pub async fn background_fetch(&self, completion: Completion) -> Result<(), LifecycleError> {
        self.start(Some(completion)).await?;
        if self.inner.platform.application_state() == OsAppState::Background {
            self.maybe_stop();
        }
        Ok(())
    }

    /// The process is about to exit: close the engine and stop listening for
    /// connectivity.
    pub async fn terminate(&self) {
        self.close().await;
        self.inner.reachability.unsubscribe();
    }

    /// Current execution state.
    pub fn state(&self) -> ApplicationState {
        self.inner.state.get()
    }

    /// Receiver observing every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ApplicationState> {
        self.inner.state.subscribe()
    }

    /// Lifecycle and connectivity events published from now on.
    pub fn events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.inner.events.subscribe()
    }

    /// Total number of loops spawned since creation.
    pub fn spawned_loops(&self) -> usize {
        self.inner.spawned.load(Ordering::SeqCst)
    }

    /// Loops whose task has not finished yet.
    pub fn active_loops(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Whether an engine handle is held, i.e. `close()` has not run since
    /// the last start.
    pub fn has_engine(&self) -> bool {
        self.inner.engine.read().is_some()
    }

    /// Engine info as key / value pairs; empty without an engine.
    pub fn core_info(&self) -> CoreInfo {
        self.inner.engine().map(|engine| parse_core_info(&engine.get_info())).unwrap_or_default()
    }

    async fn ensure_engine(&self) -> Result<SharedEngine, LifecycleError> {
        if let Some(engine) = self.inner.engine() {
            return Ok(engine);
        }

        let label = &self.inner.options.engine_label;
        let engine = self.inner.factory.create(label).map_err(|err| {
            error!(error = %err, label = %label, "mail engine creation failed");
            LifecycleError::EngineCreation(err)
        })?;

        let path = &self.inner.options.database_path;
        match engine.open(path).await {
            Ok(()) => info!(path = %path.display(), "database opened"),
            Err(err) => warn!(error = %err, "could not open database"),
        }

        *self.inner.engine.write() = Some(engine.clone());
        Ok(engine)
    }

    fn loop_plan(&self) -> Vec<LoopFamily> {
        let mut plan = vec![LoopFamily::Imap(FolderKind::Inbox), LoopFamily::Smtp];
        if self.inner.settings.watch_sentbox() {
            plan.push(LoopFamily::Imap(FolderKind::Sentbox));
        }
        if self.inner.settings.watch_mvbox() {
            plan.push(LoopFamily::Imap(FolderKind::Mvbox));
        }
        plan
    }

    fn spawn_loop(
        &self,
        family: LoopFamily,
        engine: &SharedEngine,
        cancel: &CancellationToken,
        completions: Option<CompletionSlot>,
    ) -> JoinHandle<LoopReport> {
        let task_id = self.inner.platform.begin_background_task(family.name());
        if !task_id.is_valid() {
            warn!(family = family.name(), "background task refused");
        }

        let mut folder_loop = FolderLoop::new(
            family,
            engine.clone(),
            self.inner.platform.clone(),
            self.inner.state.subscribe(),
            cancel.clone(),
            task_id,
        );
        if let Some(slot) = completions {
            folder_loop = folder_loop.with_completions(slot);
        }

        self.inner.spawned.fetch_add(1, Ordering::SeqCst);
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(self.inner.active.clone());

        tokio::spawn(async move {
            let _guard = guard;
            folder_loop.run().await
        })
    }

    fn subscribe_reachability(&self) {
        let weak = Arc::downgrade(&self.inner);
        let handler: ReachabilityHandler = Arc::new(move |reachability: Reachability| {
            if let Some(inner) = weak.upgrade() {
                inner.on_reachability(reachability);
            }
        });
        self.inner.reachability.subscribe(handler);
    }
}
