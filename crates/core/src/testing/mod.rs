//! Hand-written port mocks for tests
//!
//! Available to this crate's unit tests and, through the `test-utils`
//! feature, to downstream integration suites.

#![allow(clippy::missing_panics_doc)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mailsync_domain::{BackgroundTaskId, Connection, FolderKind, OsAppState};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::engine::{EngineError, EngineResult, MailEngine, MailEngineFactory, SharedEngine};
use crate::platform::{AppStatusProvider, BackgroundTasks, SyncSettings};
use crate::reachability::{ConnectionCallback, ReachabilityError, ReachabilityNotifier};

const fn folder_index(folder: FolderKind) -> usize {
    match folder {
        FolderKind::Inbox => 0,
        FolderKind::Sentbox => 1,
        FolderKind::Mvbox => 2,
    }
}

/// Mail engine whose idle calls block until interrupted
///
/// Interrupts only wake calls that are already waiting, so a stale
/// interrupt never shortens a later idle.
#[derive(Default)]
pub struct MockEngine {
    jobs: [AtomicUsize; 3],
    fetches: [AtomicUsize; 3],
    idles: [AtomicUsize; 3],
    interrupts: [AtomicUsize; 3],
    idle_wakers: [Notify; 3],
    smtp_jobs: AtomicUsize,
    smtp_idles: AtomicUsize,
    smtp_interrupts: AtomicUsize,
    smtp_waker: Notify,
    maybe_network: AtomicUsize,
    closes: AtomicUsize,
    opened: Mutex<Vec<PathBuf>>,
    fail_open: AtomicBool,
    info: Mutex<String>,
}

impl MockEngine {
    pub fn new() -> Self {
        let engine = Self::default();
        *engine.info.lock() = "deltachat_core_version=v1.0.0\nnumber_of_chats=0".to_string();
        engine
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_info(&self, info: impl Into<String>) {
        *self.info.lock() = info.into();
    }

    /// Wake an idling inbound loop as if new mail arrived.
    pub fn wake(&self, folder: FolderKind) {
        self.idle_wakers[folder_index(folder)].notify_waiters();
    }

    pub fn perform_jobs_calls(&self, folder: FolderKind) -> usize {
        self.jobs[folder_index(folder)].load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self, folder: FolderKind) -> usize {
        self.fetches[folder_index(folder)].load(Ordering::SeqCst)
    }

    pub fn idle_calls(&self, folder: FolderKind) -> usize {
        self.idles[folder_index(folder)].load(Ordering::SeqCst)
    }

    pub fn interrupt_calls(&self, folder: FolderKind) -> usize {
        self.interrupts[folder_index(folder)].load(Ordering::SeqCst)
    }

    pub fn perform_smtp_jobs_calls(&self) -> usize {
        self.smtp_jobs.load(Ordering::SeqCst)
    }

    pub fn smtp_idle_calls(&self) -> usize {
        self.smtp_idles.load(Ordering::SeqCst)
    }

    pub fn smtp_interrupt_calls(&self) -> usize {
        self.smtp_interrupts.load(Ordering::SeqCst)
    }

    pub fn maybe_network_calls(&self) -> usize {
        self.maybe_network.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl MailEngine for MockEngine {
    async fn open(&self, path: &Path) -> EngineResult<()> {
        self.opened.lock().push(path.to_path_buf());
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(EngineError::OpenFailed {
                path: path.to_path_buf(),
                reason: "mock open failure".to_string(),
            });
        }
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    async fn perform_jobs(&self, folder: FolderKind) {
        self.jobs[folder_index(folder)].fetch_add(1, Ordering::SeqCst);
    }

    async fn fetch(&self, folder: FolderKind) {
        self.fetches[folder_index(folder)].fetch_add(1, Ordering::SeqCst);
    }

    async fn idle(&self, folder: FolderKind) {
        let index = folder_index(folder);
        // Registered on creation, so a wake right after the counter bump is not lost.
        let woken = self.idle_wakers[index].notified();
        self.idles[index].fetch_add(1, Ordering::SeqCst);
        woken.await;
    }

    fn interrupt_idle(&self, folder: FolderKind) {
        let index = folder_index(folder);
        self.interrupts[index].fetch_add(1, Ordering::SeqCst);
        self.idle_wakers[index].notify_waiters();
    }

    async fn perform_smtp_jobs(&self) {
        self.smtp_jobs.fetch_add(1, Ordering::SeqCst);
    }

    async fn smtp_idle(&self) {
        let woken = self.smtp_waker.notified();
        self.smtp_idles.fetch_add(1, Ordering::SeqCst);
        woken.await;
    }

    fn interrupt_smtp_idle(&self) {
        self.smtp_interrupts.fetch_add(1, Ordering::SeqCst);
        self.smtp_waker.notify_waiters();
    }

    fn maybe_network(&self) {
        self.maybe_network.fetch_add(1, Ordering::SeqCst);
    }

    fn get_info(&self) -> String {
        self.info.lock().clone()
    }
}

/// Factory handing out one shared [`MockEngine`]
pub struct MockEngineFactory {
    engine: Arc<MockEngine>,
    creates: AtomicUsize,
    fail: AtomicBool,
}

impl MockEngineFactory {
    pub fn new(engine: Arc<MockEngine>) -> Self {
        Self { engine, creates: AtomicUsize::new(0), fail: AtomicBool::new(false) }
    }

    pub fn fail_next_create(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

impl MailEngineFactory for MockEngineFactory {
    fn create(&self, label: &str) -> EngineResult<SharedEngine> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(EngineError::CreationFailed(format!("mock refused label {label}")));
        }
        Ok(self.engine.clone())
    }
}

/// Scriptable OS status and background task registry
pub struct MockPlatform {
    os_state: Mutex<OsAppState>,
    remaining: Mutex<Duration>,
    script: Mutex<VecDeque<Duration>>,
    remaining_queries: AtomicUsize,
    refuse: AtomicBool,
    next_id: AtomicU64,
    begun: AtomicUsize,
    live: Mutex<HashSet<BackgroundTaskId>>,
    ended: Mutex<Vec<BackgroundTaskId>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            os_state: Mutex::new(OsAppState::Active),
            remaining: Mutex::new(Duration::MAX),
            script: Mutex::new(VecDeque::new()),
            remaining_queries: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            begun: AtomicUsize::new(0),
            live: Mutex::new(HashSet::new()),
            ended: Mutex::new(Vec::new()),
        }
    }

    pub fn set_os_state(&self, state: OsAppState) {
        *self.os_state.lock() = state;
    }

    /// Remaining time reported once the script is used up.
    pub fn set_remaining(&self, remaining: Duration) {
        *self.remaining.lock() = remaining;
    }

    /// Values reported by successive `background_time_remaining` calls.
    pub fn script_remaining(&self, values: impl IntoIterator<Item = Duration>) {
        self.script.lock().extend(values);
    }

    pub fn remaining_queries(&self) -> usize {
        self.remaining_queries.load(Ordering::SeqCst)
    }

    /// Make `begin_background_task` return the invalid id.
    pub fn refuse_tasks(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Valid ids handed out so far.
    pub fn begun_tasks(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn active_tasks(&self) -> usize {
        self.live.lock().len()
    }

    pub fn ended_tasks(&self) -> Vec<BackgroundTaskId> {
        self.ended.lock().clone()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundTasks for MockPlatform {
    fn begin_background_task(&self, _name: &str) -> BackgroundTaskId {
        if self.refuse.load(Ordering::SeqCst) {
            return BackgroundTaskId::INVALID;
        }
        let id = BackgroundTaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.begun.fetch_add(1, Ordering::SeqCst);
        self.live.lock().insert(id);
        id
    }

    fn end_background_task(&self, id: BackgroundTaskId) {
        if self.live.lock().remove(&id) {
            self.ended.lock().push(id);
        }
    }
}

impl AppStatusProvider for MockPlatform {
    fn application_state(&self) -> OsAppState {
        *self.os_state.lock()
    }

    fn background_time_remaining(&self) -> Duration {
        self.remaining_queries.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or_else(|| *self.remaining.lock())
    }
}

/// Notifier driven by [`MockNotifier::emit`]
pub struct MockNotifier {
    callback: Mutex<Option<ConnectionCallback>>,
    fail: bool,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self { callback: Mutex::new(None), fail: false, starts: AtomicUsize::new(0), stops: AtomicUsize::new(0) }
    }

    /// A notifier whose `start` always fails.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::new() }
    }

    /// Deliver `connection` to the current callback, if started.
    pub fn emit(&self, connection: Connection) {
        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(connection);
        }
    }

    pub fn start_calls(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ReachabilityNotifier for MockNotifier {
    fn start(&self, callback: ConnectionCallback) -> Result<(), ReachabilityError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReachabilityError::Unavailable("mock notifier".to_string()));
        }
        *self.callback.lock() = Some(callback);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.callback.lock().take();
    }
}

/// Mutable watch flags
#[derive(Debug, Default)]
pub struct MockSettings {
    sentbox: AtomicBool,
    mvbox: AtomicBool,
}

impl MockSettings {
    pub fn new(watch_sentbox: bool, watch_mvbox: bool) -> Self {
        Self { sentbox: AtomicBool::new(watch_sentbox), mvbox: AtomicBool::new(watch_mvbox) }
    }

    pub fn set_watch_sentbox(&self, watch: bool) {
        self.sentbox.store(watch, Ordering::SeqCst);
    }

    pub fn set_watch_mvbox(&self, watch: bool) {
        self.mvbox.store(watch, Ordering::SeqCst);
    }
}

impl SyncSettings for MockSettings {
    fn watch_sentbox(&self) -> bool {
        self.sentbox.load(Ordering::SeqCst)
    }

    fn watch_mvbox(&self) -> bool {
        self.mvbox.load(Ordering::SeqCst)
    }
}
