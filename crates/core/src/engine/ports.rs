//! Port interface for the mail protocol engine
//!
//! Implementations are responsible for their own internal thread safety.
//! The core never issues two calls concurrently from the same loop.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mailsync_domain::FolderKind;

use super::error::EngineResult;

/// Shared handle to an engine instance
pub type SharedEngine = Arc<dyn MailEngine>;

/// Opaque mail engine consumed by the sync loops and the orchestrator
#[async_trait]
pub trait MailEngine: Send + Sync {
    /// Open the database at `path`.
    async fn open(&self, path: &Path) -> EngineResult<()>;

    /// Close the database and release engine resources.
    async fn close(&self);

    /// Run queued inbound jobs for `folder`.
    async fn perform_jobs(&self, folder: FolderKind);

    /// Fetch new messages for `folder`.
    async fn fetch(&self, folder: FolderKind);

    /// Wait until new data arrives, a job is queued or the idle is
    /// interrupted.
    async fn idle(&self, folder: FolderKind);

    /// Wake a pending [`MailEngine::idle`] for `folder`. Must not block.
    fn interrupt_idle(&self, folder: FolderKind);

    /// Run queued outbound jobs.
    async fn perform_smtp_jobs(&self);

    /// Wait until an outbound job is queued or the idle is interrupted.
    async fn smtp_idle(&self);

    /// Wake a pending [`MailEngine::smtp_idle`]. Must not block.
    fn interrupt_smtp_idle(&self);

    /// Hint that connectivity may have changed so pending backoff can be
    /// skipped. Fire-and-forget.
    fn maybe_network(&self);

    /// Engine diagnostics as newline separated `key=value` pairs.
    fn get_info(&self) -> String;
}

/// Creates engine handles.
///
/// The engine's own event callback (message arrival, progress) is owned by
/// the factory implementation and never passes through the core.
pub trait MailEngineFactory: Send + Sync {
    /// Create a new engine tagged with `label`.
    fn create(&self, label: &str) -> EngineResult<SharedEngine>;
}
